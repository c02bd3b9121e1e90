//! # daypress
//!
//! Static blog generator for Day One journals. Your journal is the data
//! source: every `.doentry` record tagged for publication becomes one HTML
//! page, and an index page lists the published entries newest-first.
//!
//! # Architecture: One-Pass Pipeline
//!
//! ```text
//! walk journal → decode → tag filter → bake → template → publish
//!                                                   ↘ summary list → index
//! ```
//!
//! Entries are processed one at a time in sorted traversal order; each runs
//! its own decode → normalize → extract → publish chain to completion (or
//! local failure) before the next begins. A failed entry is logged and
//! skipped; a partial batch is a normal outcome, not a failed run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`record`] | Decodes one `.doentry` property list into a typed [`record::Record`] |
//! | [`markdown`] | Renders body markup to HTML with the journal dialect extensions |
//! | [`extract`] | Pulls title and teaser out of the rendered HTML tree |
//! | [`entry`] | Normalization ("bake"), filename derivation, [`entry::Summary`] projection |
//! | [`publish`] | Staleness check + atomic temp-write + rename, timestamp propagation |
//! | [`templates`] | Runtime minijinja template sets and the `short` teaser filter |
//! | [`build`] | Traversal driver: per-entry pipeline, summary accumulation, index generation |
//!
//! # Design Decisions
//!
//! ## Content-Addressed Filenames
//!
//! A page's filename is the SHA-256 of its entry's UUID, so the same entry
//! lands at the same path on every run without any on-disk state. That
//! stability is what makes incremental publishing possible: the next run
//! finds the previous run's file at the same path and compares byte length
//! and mtime against a fresh render.
//!
//! ## Creation Time as File mtime
//!
//! Published pages carry their entry's creation instant as the file
//! modification time. The mtime doubles as the staleness token: an exact
//! match together with an equal byte length means the page is current. The
//! pair can false-negative on a same-length edit, accepted for a
//! single-author republish loop.
//!
//! ## Runtime Templates Over Compiled HTML
//!
//! Pages are rendered through minijinja templates loaded from disk at
//! startup rather than compile-time HTML macros. Blog layouts change far
//! more often than pipeline logic, and editing `entry.html` must not
//! require rebuilding the binary.
//!
//! ## Atomic Writes, Everywhere
//!
//! Every output file lands via temp-file-plus-rename inside the target
//! directory. A crash mid-write leaves the previous page intact, and
//! readers of the output directory never observe a half-written file.

pub mod build;
pub mod entry;
pub mod extract;
pub mod markdown;
pub mod publish;
pub mod record;
pub mod templates;
