//! Atomic page publishing with staleness detection.
//!
//! Published pages carry their entry's creation instant as the file
//! modification time, so a page is up to date exactly when its byte length
//! matches a fresh render and its mtime matches the entry. That pair is a
//! cheap heuristic, not a content hash: a same-length edit under an
//! unchanged timestamp slips through, accepted for a single-author
//! republish loop.
//!
//! All writes go through a temp file created next to the target (same
//! filesystem, so the final rename is atomic) and the temp file is removed
//! on every error path short of the rename. A crash mid-write leaves the
//! previous page intact; readers of the output directory never observe a
//! half-written file.

use std::fs::{self, FileTimes, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::SystemTime;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to move page into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Outcome of a page publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    UpToDate,
}

/// File mode for published pages: world-readable, owner-writable.
const PAGE_MODE: u32 = 0o644;

/// Write `content` to `target` unless the file already there is current.
///
/// `mtime` is the entry's creation instant; it becomes the published file's
/// atime and mtime, and it is what the staleness check compares against on
/// the next run.
pub fn publish_page(
    target: &Path,
    content: &[u8],
    mtime: SystemTime,
) -> Result<Outcome, PublishError> {
    match fs::metadata(target) {
        // Target absent: write.
        Err(_) => {}
        // Present with matching length and timestamp: current.
        Ok(meta)
            if meta.len() == content.len() as u64
                && meta.modified().map(|m| m == mtime).unwrap_or(false) =>
        {
            info!(path = %target.display(), "page up to date, skipping");
            return Ok(Outcome::UpToDate);
        }
        // Present but differs: rewrite.
        Ok(_) => {}
    }

    info!(path = %target.display(), "updating page");
    write_atomic(target, content, Some(mtime))?;
    Ok(Outcome::Written)
}

/// Unconditionally (re)write the index page.
pub fn publish_index(target: &Path, content: &[u8]) -> Result<(), PublishError> {
    info!(path = %target.display(), "updating index");
    write_atomic(target, content, None)
}

/// Temp-write + rename. Setting the timestamps can fail without failing the
/// publish; everything else is surfaced to the caller, with the temp file
/// cleaned up on the way out.
fn write_atomic(
    target: &Path,
    content: &[u8],
    stamp: Option<SystemTime>,
) -> Result<(), PublishError> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().set_permissions(Permissions::from_mode(PAGE_MODE))?;
    if let Some(stamp) = stamp {
        let times = FileTimes::new().set_accessed(stamp).set_modified(stamp);
        if let Err(err) = tmp.as_file().set_times(times) {
            warn!(path = %target.display(), %err, "failed to set timestamps");
        }
    }
    tmp.persist(target)?;
    Ok(())
}
