//! Build driver: walk the journal, publish pages, generate the index.
//!
//! One synchronous pass over the journal directory. Every `.doentry` file
//! runs its own decode → tag filter → bake → template → publish chain to
//! completion (or local failure) before the next file begins; the only
//! state carried across iterations is the summary list owned by [`build`].
//!
//! ## Error policy
//!
//! Fatal, nothing (further) produced: template loading, output directory
//! creation, a failure of the traversal itself (journal directory missing,
//! unreadable subdirectory), and rendering or writing the index.
//!
//! Per-entry, logged at `warn` and skipped: unreadable file, malformed
//! record, unknown time zone, markup tree parse failure, entry template
//! render failure, publish failure. A partial batch is a normal outcome,
//! not a failed run.
//!
//! ## Index membership
//!
//! A summary is appended only after its page is on disk or confirmed
//! current (publish-then-append). An entry whose page failed to publish
//! never appears in the index, so the index only ever links to pages that
//! exist.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::entry::{BakeError, Entry, Summary};
use crate::publish::{self, Outcome, PublishError};
use crate::record::{DecodeError, Record};
use crate::templates::Templates;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("journal walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("index write failed: {0}")]
    Index(#[from] PublishError),
}

/// Why a single entry dropped out of the batch. Every case is logged and
/// skipped; none of them stops the walk.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("normalization failed: {0}")]
    Bake(#[from] BakeError),
    #[error("page render failed: {0}")]
    Render(#[from] minijinja::Error),
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Counts for one build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written (new or stale).
    pub written: usize,
    /// Pages skipped because length and mtime already matched.
    pub up_to_date: usize,
    /// Entries dropped by a per-entry failure.
    pub failed: usize,
    /// Whether an index was generated this run.
    pub indexed: bool,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} up to date, {} failed",
            self.written, self.up_to_date, self.failed
        )?;
        if self.indexed {
            write!(f, ", index updated")
        } else {
            write!(f, ", no index")
        }
    }
}

const ENTRY_EXTENSION: &str = "doentry";
const INDEX_FILENAME: &str = "index.html";

/// Run the full pipeline: walk `journal`, publish every entry tagged `tag`
/// into `output`, then write the index.
///
/// The walk is sorted by file name so discovery order, and with it the
/// relative order of same-timestamp summaries, is deterministic.
pub fn build(
    journal: &Path,
    templates_dir: &Path,
    output: &Path,
    tag: &str,
) -> Result<BuildReport, BuildError> {
    let templates = Templates::load(templates_dir)?;
    fs::create_dir_all(output)?;

    let mut report = BuildReport::default();
    let mut summaries: Vec<Summary> = Vec::new();

    for file in WalkDir::new(journal).sort_by_file_name() {
        let file = file?;
        if !file.file_type().is_file() {
            continue;
        }
        if file.path().extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
            continue;
        }
        match process_entry(file.path(), tag, &templates, output) {
            Ok(Some((summary, outcome))) => {
                match outcome {
                    Outcome::Written => report.written += 1,
                    Outcome::UpToDate => report.up_to_date += 1,
                }
                summaries.push(summary);
            }
            Ok(None) => {
                debug!(path = %file.path().display(), "entry not tagged, ignored");
            }
            Err(err) => {
                warn!(path = %file.path().display(), %err, "entry skipped");
                report.failed += 1;
            }
        }
    }

    if summaries.is_empty() {
        info!("no qualifying entries, index not generated");
        return Ok(report);
    }

    sort_newest_first(&mut summaries);
    let index = templates.render_index(&summaries)?;
    publish::publish_index(&output.join(INDEX_FILENAME), index.as_bytes())?;
    report.indexed = true;
    Ok(report)
}

/// Decode, filter, bake, render, and publish a single journal file.
///
/// `None` means the entry does not carry the filter tag. The summary is
/// returned only once the page is on disk (or confirmed current), which is
/// what keeps failed pages out of the index.
fn process_entry(
    path: &Path,
    tag: &str,
    templates: &Templates,
    output: &Path,
) -> Result<Option<(Summary, Outcome)>, EntryError> {
    let bytes = fs::read(path)?;
    let record = Record::from_bytes(&bytes)?;
    if !record.has_tag(tag) {
        return Ok(None);
    }
    let entry = Entry::bake(record)?;
    let page = templates.render_entry(&entry)?;
    let target = output.join(entry.filename());
    let mtime = SystemTime::from(entry.creation_date);
    let outcome = publish::publish_page(&target, page.as_bytes(), mtime)?;
    Ok(Some((entry.shallow(), outcome)))
}

/// Stable sort, newest first. Summaries sharing a timestamp keep their
/// discovery order.
pub fn sort_newest_first(summaries: &mut [Summary]) {
    summaries.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn summary(title: &str, secs: i64) -> Summary {
        Summary {
            creation_date: Tz::UTC.timestamp_opt(secs, 0).unwrap(),
            title: title.into(),
            teaser: String::new(),
            filename: format!("{title}.html"),
        }
    }

    #[test]
    fn sorts_newest_first() {
        let mut items = vec![
            summary("january", 1_577_836_800),
            summary("march", 1_583_020_800),
            summary("february", 1_580_515_200),
        ];
        sort_newest_first(&mut items);
        let titles: Vec<&str> = items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["march", "february", "january"]);
    }

    #[test]
    fn equal_timestamps_keep_discovery_order() {
        let mut items = vec![
            summary("first-seen", 1_580_515_200),
            summary("second-seen", 1_580_515_200),
            summary("newer", 1_583_020_800),
        ];
        sort_newest_first(&mut items);
        let titles: Vec<&str> = items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "first-seen", "second-seen"]);
    }

    #[test]
    fn report_display_reads_naturally() {
        let report = BuildReport {
            written: 3,
            up_to_date: 2,
            failed: 0,
            indexed: true,
        };
        assert_eq!(report.to_string(), "3 written, 2 up to date, 0 failed, index updated");

        let empty = BuildReport::default();
        assert_eq!(empty.to_string(), "0 written, 0 up to date, 0 failed, no index");
    }
}
