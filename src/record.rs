//! Journal record decoding.
//!
//! Day One stores one entry per `.doentry` file as an Apple property list,
//! either XML or binary. This module decodes those bytes into a typed
//! [`Record`] and nothing more: no markup work, no time-zone handling.
//! Interpretation happens downstream in [`entry`](crate::entry).
//!
//! Decoding is all-or-nothing: a malformed container, a missing required
//! key, or a mistyped value is a [`DecodeError`], never a partially
//! populated record.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed entry record: {0}")]
    Plist(#[from] plist::Error),
}

/// One decoded journal entry, fields exactly as stored on disk.
///
/// `UUID`, `Creation Date`, `Time Zone` and `Entry Text` are required.
/// `Starred`, `Tags` and `Stripped` default when absent; they are carried
/// through to the page template but never interpreted by the pipeline.
///
/// `entry_text` is HTML-entity-escaped as stored; it stays escaped until
/// [`Entry::bake`](crate::entry::Entry::bake) unescapes it, exactly once,
/// right before rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    #[serde(rename = "UUID")]
    pub uuid: String,
    /// Creation instant as stored: a plist date, which is always UTC.
    #[serde(rename = "Creation Date")]
    pub creation_date: plist::Date,
    /// IANA zone name the entry was written in, e.g. `America/New_York`.
    #[serde(rename = "Time Zone")]
    pub time_zone: String,
    #[serde(rename = "Entry Text")]
    pub entry_text: String,
    #[serde(rename = "Starred", default)]
    pub starred: bool,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    #[serde(rename = "Stripped", default)]
    pub stripped: bool,
}

impl Record {
    /// Decode a single `.doentry` property list (XML or binary).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(plist::from_bytes(bytes)?)
    }

    /// Whether this record carries `tag` (exact, case-sensitive).
    ///
    /// The empty tag never matches: entries are published only when
    /// explicitly tagged, so an empty filter selects nothing.
    pub fn has_tag(&self, tag: &str) -> bool {
        !tag.is_empty() && self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doentry_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
{body}
</dict>
</plist>
"#
        )
    }

    const FULL_BODY: &str = r#"    <key>Creation Date</key>
    <date>2020-03-01T12:30:00Z</date>
    <key>Entry Text</key>
    <string># Hello

First paragraph.</string>
    <key>Starred</key>
    <true/>
    <key>Tags</key>
    <array>
        <string>blog</string>
        <string>travel</string>
    </array>
    <key>Time Zone</key>
    <string>America/New_York</string>
    <key>UUID</key>
    <string>6E5DFE66F3CC4D969BBA8DD3D8CA27A4</string>"#;

    #[test]
    fn decodes_full_record() {
        let record = Record::from_bytes(doentry_xml(FULL_BODY).as_bytes()).unwrap();
        assert_eq!(record.uuid, "6E5DFE66F3CC4D969BBA8DD3D8CA27A4");
        assert_eq!(record.time_zone, "America/New_York");
        assert!(record.entry_text.starts_with("# Hello"));
        assert!(record.starred);
        assert_eq!(record.tags, vec!["blog", "travel"]);
        assert!(!record.stripped);
    }

    #[test]
    fn optional_fields_default() {
        let body = r#"    <key>Creation Date</key>
    <date>2020-03-01T12:30:00Z</date>
    <key>Entry Text</key>
    <string>hi</string>
    <key>Time Zone</key>
    <string>UTC</string>
    <key>UUID</key>
    <string>ABC123</string>"#;
        let record = Record::from_bytes(doentry_xml(body).as_bytes()).unwrap();
        assert!(!record.starred);
        assert!(record.tags.is_empty());
        assert!(!record.stripped);
    }

    #[test]
    fn missing_required_key_is_error() {
        // FULL_BODY without the UUID pair.
        let body = FULL_BODY
            .replace("    <key>UUID</key>\n", "")
            .replace("    <string>6E5DFE66F3CC4D969BBA8DD3D8CA27A4</string>", "");
        assert!(Record::from_bytes(doentry_xml(&body).as_bytes()).is_err());
    }

    #[test]
    fn mistyped_field_is_error() {
        let body = FULL_BODY.replace(
            "    <array>\n        <string>blog</string>\n        <string>travel</string>\n    </array>",
            "    <string>blog</string>",
        );
        assert!(Record::from_bytes(doentry_xml(&body).as_bytes()).is_err());
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(Record::from_bytes(b"not a plist at all").is_err());
    }

    #[test]
    fn decodes_binary_plists_too() {
        use plist::{Date, Value};
        use std::time::{Duration, SystemTime};

        let mut dict = plist::Dictionary::new();
        dict.insert("UUID".into(), Value::String("BIN1".into()));
        dict.insert(
            "Creation Date".into(),
            Value::Date(Date::from(SystemTime::UNIX_EPOCH + Duration::from_secs(1_583_065_800))),
        );
        dict.insert("Time Zone".into(), Value::String("UTC".into()));
        dict.insert("Entry Text".into(), Value::String("# T\n\nbody".into()));
        let mut buf = Vec::new();
        plist::to_writer_binary(&mut buf, &Value::Dictionary(dict)).unwrap();

        let record = Record::from_bytes(&buf).unwrap();
        assert_eq!(record.uuid, "BIN1");
        assert_eq!(record.entry_text, "# T\n\nbody");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn tag_matches_exactly() {
        let record = Record::from_bytes(doentry_xml(FULL_BODY).as_bytes()).unwrap();
        assert!(record.has_tag("blog"));
        assert!(record.has_tag("travel"));
        assert!(!record.has_tag("Blog"));
        assert!(!record.has_tag("blo"));
        assert!(!record.has_tag("photography"));
    }

    #[test]
    fn empty_tag_never_matches() {
        let record = Record::from_bytes(doentry_xml(FULL_BODY).as_bytes()).unwrap();
        assert!(!record.has_tag(""));
    }
}
