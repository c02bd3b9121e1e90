//! Runtime template sets for the generated site.
//!
//! Two named template sets are loaded from the template directory once at
//! startup: `entry.html`, rendered once per published entry, and
//! `index.html`, rendered once per run with the sorted summary list. A
//! broken or missing set is a startup failure; nothing is generated from
//! half a layout.
//!
//! Templates are minijinja files. Autoescaping is on for `.html` names, so
//! layouts emit the pre-rendered body with the `safe` filter:
//!
//! ```jinja
//! <article>{{ entry.body_html | safe }}</article>
//! ```
//!
//! The `short` filter clamps teaser text on the index page:
//!
//! ```jinja
//! <p>{{ item.teaser | short(40) }}</p>
//! ```

use std::path::Path;

use minijinja::{Environment, context, path_loader};

use crate::entry::{Entry, Summary};

/// Per-entry page template name.
pub const ENTRY_TEMPLATE: &str = "entry.html";
/// Index page template name.
pub const INDEX_TEMPLATE: &str = "index.html";

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load both template sets from `dir`.
    ///
    /// Both names are resolved eagerly so a broken set fails here, before
    /// any output is produced.
    pub fn load(dir: &Path) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        env.add_filter("short", short);
        env.get_template(ENTRY_TEMPLATE)?;
        env.get_template(INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the page for one entry.
    pub fn render_entry(&self, entry: &Entry) -> Result<String, minijinja::Error> {
        self.env.get_template(ENTRY_TEMPLATE)?.render(context! { entry })
    }

    /// Render the index page from the sorted summary list.
    pub fn render_index(&self, items: &[Summary]) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(context! { items })
    }
}

/// First `min(limit, word_count)` whitespace-delimited words of `text`,
/// rejoined with single spaces.
pub fn short(text: String, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let limit = limit.min(words.len());
    words[..limit].join(" ")
}
