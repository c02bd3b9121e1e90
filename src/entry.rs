//! Entry model: normalization, filename derivation, summary projection.
//!
//! [`Entry::bake`] turns a decoded [`Record`] into everything the page
//! template needs: the creation instant expressed in the entry's own time
//! zone, the body unescaped and rendered to HTML, and the title/teaser
//! fields pulled out of the rendered tree. Baking either succeeds fully or
//! fails with a [`BakeError`]; a failed entry is dropped by the driver
//! without stopping the batch.
//!
//! [`Summary`] is the slice of an entry the index page needs. It is
//! projected once per published entry and owned by the driver's
//! accumulation list for the rest of the run.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::extract;
use crate::markdown;
use crate::record::Record;

#[derive(Error, Debug)]
pub enum BakeError {
    #[error("unknown time zone: {0}")]
    UnknownZone(String),
    #[error("rendered markup failed to parse: {0}")]
    Markup(#[from] tl::ParseError),
}

/// A fully normalized journal entry, ready for the page template.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub uuid: String,
    /// Creation instant expressed in the entry's own time zone.
    /// Authoritative for sort order and for the published file's timestamps.
    pub creation_date: DateTime<Tz>,
    pub time_zone: String,
    /// Body markup with HTML entities unescaped (exactly once).
    pub text: String,
    pub starred: bool,
    pub tags: Vec<String>,
    pub stripped: bool,
    /// Rendered HTML for `text`. Templates emit this with `| safe`.
    pub body_html: String,
    /// Flattened text of the first `<h1>`; empty when the body has none.
    pub title: String,
    /// Flattened text of the first `<p>`; empty when the body has none.
    pub teaser: String,
}

/// Projection of an [`Entry`] carried into the index page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub creation_date: DateTime<Tz>,
    pub title: String,
    pub teaser: String,
    pub filename: String,
}

impl Entry {
    /// Normalize a decoded record into a publishable entry.
    ///
    /// Resolves the IANA zone and expresses the creation instant in it,
    /// unescapes the stored body text once, renders it to HTML, and pulls
    /// title and teaser out of the rendered tree.
    pub fn bake(record: Record) -> Result<Self, BakeError> {
        let zone: Tz = record
            .time_zone
            .parse()
            .map_err(|_| BakeError::UnknownZone(record.time_zone.clone()))?;
        let utc: DateTime<Utc> = SystemTime::from(record.creation_date).into();
        let creation_date = utc.with_timezone(&zone);

        let text = html_escape::decode_html_entities(&record.entry_text).into_owned();
        let body_html = markdown::render(&text);

        let (title, teaser) = {
            let dom = extract::parse(&body_html)?;
            (
                extract::first_element(&dom, "h1").unwrap_or_default(),
                extract::first_element(&dom, "p").unwrap_or_default(),
            )
        };

        Ok(Entry {
            uuid: record.uuid,
            creation_date,
            time_zone: record.time_zone,
            text,
            starred: record.starred,
            tags: record.tags,
            stripped: record.stripped,
            body_html,
            title,
            teaser,
        })
    }

    /// Output filename for this entry.
    pub fn filename(&self) -> String {
        page_filename(&self.uuid)
    }

    /// Project the fields the index page needs.
    pub fn shallow(&self) -> Summary {
        Summary {
            creation_date: self.creation_date,
            title: self.title.clone(),
            teaser: self.teaser.clone(),
            filename: self.filename(),
        }
    }
}

/// Page filename for an entry id: SHA-256 of the id, hex, `.html`.
///
/// A pure function of the id, so the same entry lands at the same path on
/// every run; the staleness check in [`publish`](crate::publish) depends
/// on that.
pub fn page_filename(uuid: &str) -> String {
    let digest = Sha256::digest(uuid.as_bytes());
    format!("{digest:x}.html")
}
