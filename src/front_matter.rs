//! Front matter: the TOML block at the top of a content file.
//!
//! ```text
//! +++
//! title = "Hello World"
//! create_time = 2020-01-02T10:00:00Z
//! tags = ["rust", "web"]
//! +++
//! The markdown body starts here.
//! ```
//!
//! The block is delimited by the first two lines that read exactly `+++`
//! (surrounding whitespace ignored). A file with fewer than two marker lines
//! has no metadata and its whole text is the body.
//!
//! Every field is optional. An absent field is *unspecified* and may be filled
//! in by an ancestor `_index.md` during resolution; a present field, even
//! `pagination = 0`, is kept as written.
//!
//! Keys match regardless of case and underscores, so `CreateTime`,
//! `createtime` and `create_time` are the same key, and `Template` is read as
//! `file_template`. Unknown keys are logged and ignored. Every tag must keep
//! at least one letter or digit in its URL slug.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use std::collections::BTreeSet;
use thiserror::Error;

/// Line that opens and closes the metadata block.
pub const MARKER: &str = "+++";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("tag {0:?} has no letters or digits to put in a URL")]
    UnusableTag(String),
}

/// Field names of [`ContentRecord`], as written by [`compose`].
const FIELDS: &[&str] = &[
    "title",
    "description",
    "author",
    "create_time",
    "update_time",
    "tags",
    "draft",
    "theme",
    "dir_template",
    "file_template",
    "tag_files_template",
    "pagination",
];

/// Metadata of one content file, exactly as written in its front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        deserialize_with = "deserialize_time",
        serialize_with = "serialize_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(
        deserialize_with = "deserialize_time",
        serialize_with = "serialize_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub draft: bool,

    // Inheritable fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_files_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<i64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Split a content file into its raw metadata block and its body.
pub fn split(source: &str) -> (String, String) {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == MARKER)
        .map(|(idx, _)| idx)
        .take(2)
        .collect();

    let (open, close) = match markers.as_slice() {
        [open, close] => (*open, *close),
        _ => return (String::new(), source.to_string()),
    };

    let meta = lines[open + 1..close].concat();
    let mut body = lines[..open].concat();
    body.push_str(&lines[close + 1..].concat());
    (meta, body)
}

/// Parse a content file into its metadata record and raw markdown body.
pub fn parse(source: &str) -> Result<(ContentRecord, String), FrontMatterError> {
    let (meta, body) = split(source);
    let table: toml::Table = toml::from_str(&meta)?;
    let record = ContentRecord::deserialize(toml::Value::Table(canonical_keys(table)))?;
    check_tags(&record)?;
    Ok((record, body))
}

/// Rename every key to its [`FIELDS`] spelling, dropping keys that match none.
fn canonical_keys(table: toml::Table) -> toml::Table {
    let mut canonical = toml::Table::new();
    for (key, value) in table {
        let folded: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let field = match folded.as_str() {
            "template" => Some("file_template"),
            _ => FIELDS.iter().copied().find(|f| f.replace('_', "") == folded),
        };
        match field {
            Some(field) => {
                canonical.insert(field.to_string(), value);
            }
            None => tracing::warn!(key = %key, "ignoring unknown front matter key"),
        }
    }
    canonical
}

/// Reject tags that cannot be turned into a listing URL.
pub fn check_tags(record: &ContentRecord) -> Result<(), FrontMatterError> {
    match record.tags.iter().find(|tag| crate::url::tag_slug(tag).is_empty()) {
        Some(tag) => Err(FrontMatterError::UnusableTag(tag.clone())),
        None => Ok(()),
    }
}

/// Inverse of [`parse`]: write `record` as a front-matter block followed by `body`.
pub fn compose(record: &ContentRecord, body: &str) -> Result<String, FrontMatterError> {
    let meta = toml::to_string(record)?;
    let mut out = String::with_capacity(meta.len() + body.len() + 8);
    out.push_str(MARKER);
    out.push('\n');
    out.push_str(&meta);
    out.push_str(MARKER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

/// Parse a timestamp in any of the forms TOML allows, normalized to UTC.
///
/// Accepted: offset datetimes (`2020-01-02T10:00:00+07:00`), local datetimes
/// (`2020-01-02T10:00:00`, taken as UTC) and local dates (`2020-01-02`, taken
/// as midnight UTC). A space may replace the `T`.
pub fn parse_time(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    let normalized = text.replacen(' ', "T", 1);

    if let Ok(time) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(naive.and_utc());
    }
    Err(format!("invalid date or datetime `{text}`"))
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match toml::Value::deserialize(deserializer)? {
        toml::Value::Datetime(datetime) => datetime.to_string(),
        toml::Value::String(text) => text,
        other => {
            return Err(de::Error::custom(format!(
                "expected a date or datetime, found {}",
                other.type_str()
            )));
        }
    };
    parse_time(&text).map(Some).map_err(de::Error::custom)
}

// Written back as a native TOML datetime rather than a quoted string.
fn serialize_time<S>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(time) => {
            let stamp = time.to_rfc3339_opts(SecondsFormat::Secs, true);
            let datetime: toml::value::Datetime = stamp.parse().map_err(ser::Error::custom)?;
            datetime.serialize(serializer)
        }
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn split_separates_meta_and_body() {
        let (meta, body) = split("+++\ntitle = \"Hi\"\n+++\n# Body\n");
        assert_eq!(meta, "title = \"Hi\"\n");
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn split_tolerates_whitespace_around_markers() {
        let (meta, body) = split("  +++  \ntitle = \"Hi\"\n+++\r\nbody");
        assert_eq!(meta, "title = \"Hi\"\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn single_marker_means_no_metadata() {
        let source = "+++\ntitle = \"Hi\"\nno closing marker\n";
        let (meta, body) = split(source);
        assert!(meta.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn only_first_two_markers_delimit() {
        let (meta, body) = split("+++\na = 1\n+++\nbefore\n+++\nafter\n");
        assert_eq!(meta, "a = 1\n");
        assert_eq!(body, "before\n+++\nafter\n");
    }

    #[test]
    fn parse_reads_all_fields() {
        let source = r#"+++
title = "Hello"
description = "First post"
author = "Ann"
create_time = 2020-01-02T10:00:00Z
update_time = 2020-02-03
tags = ["web", "rust", "web"]
draft = true
theme = "paper"
dir_template = "list"
file_template = "post"
tag_files_template = "tagged"
pagination = 5
+++
Body text
"#;
        let (record, body) = parse(source).unwrap();
        assert_eq!(record.title.as_deref(), Some("Hello"));
        assert_eq!(record.author.as_deref(), Some("Ann"));
        assert_eq!(
            record.create_time,
            Some(Utc.with_ymd_and_hms(2020, 1, 2, 10, 0, 0).unwrap())
        );
        assert_eq!(
            record.update_time,
            Some(Utc.with_ymd_and_hms(2020, 2, 3, 0, 0, 0).unwrap())
        );
        // Duplicates collapse
        assert_eq!(record.tags.len(), 2);
        assert!(record.draft);
        assert_eq!(record.theme.as_deref(), Some("paper"));
        assert_eq!(record.tag_files_template.as_deref(), Some("tagged"));
        assert_eq!(record.pagination, Some(5));
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn missing_fields_stay_unspecified() {
        let (record, _) = parse("no front matter at all").unwrap();
        assert_eq!(record, ContentRecord::default());
        assert_eq!(record.pagination, None);
    }

    #[test]
    fn explicit_zero_pagination_is_specified() {
        let (record, _) = parse("+++\npagination = 0\n+++\n").unwrap();
        assert_eq!(record.pagination, Some(0));
    }

    #[test]
    fn unknown_keys_ignored() {
        let (record, body) = parse("+++\ntitel = \"typo\"\ndraft = true\n+++\nBody").unwrap();
        assert_eq!(record.title, None);
        assert!(record.draft);
        assert_eq!(body, "Body");
    }

    #[test]
    fn pascal_and_lowercase_keys_accepted() {
        let source = r#"+++
Title = "Old Style"
Description = "Written by an older tool"
Author = "Ann"
CreateTime = 2019-07-01T08:00:00Z
updatetime = 2019-07-02
Tags = ["go", "web"]
Theme = "paper"
Template = "post"
Pagination = 4
+++
Body
"#;
        let (record, _) = parse(source).unwrap();
        assert_eq!(record.title.as_deref(), Some("Old Style"));
        assert_eq!(record.author.as_deref(), Some("Ann"));
        assert_eq!(
            record.create_time,
            Some(Utc.with_ymd_and_hms(2019, 7, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            record.update_time,
            Some(Utc.with_ymd_and_hms(2019, 7, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(record.tags.len(), 2);
        assert_eq!(record.theme.as_deref(), Some("paper"));
        assert_eq!(record.file_template.as_deref(), Some("post"));
        assert_eq!(record.pagination, Some(4));
    }

    #[test]
    fn tags_without_slug_rejected() {
        for tags in [r#"[""]"#, r#"["  "]"#, r#"["rust", "/-/"]"#] {
            let result = parse(&format!("+++\ntags = {tags}\n+++\n"));
            assert!(matches!(result, Err(FrontMatterError::UnusableTag(_))), "{tags}: {result:?}");
        }
        assert!(parse("+++\ntags = [\"c#\", \"ci/cd\"]\n+++\n").is_ok());
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(parse("+++\ntitle = \n+++\n").is_err());
    }

    #[test]
    fn times_accept_strings_and_offsets() {
        let (record, _) =
            parse("+++\ncreate_time = \"2020-01-02 10:00:00\"\nupdate_time = 2020-01-02T10:00:00+02:00\n+++\n")
                .unwrap();
        assert_eq!(
            record.create_time,
            Some(Utc.with_ymd_and_hms(2020, 1, 2, 10, 0, 0).unwrap())
        );
        assert_eq!(
            record.update_time,
            Some(Utc.with_ymd_and_hms(2020, 1, 2, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn times_reject_garbage() {
        assert!(parse("+++\ncreate_time = \"yesterday\"\n+++\n").is_err());
        assert!(parse("+++\ncreate_time = 12\n+++\n").is_err());
    }

    #[test]
    fn compose_writes_parseable_block() {
        let record = ContentRecord {
            title: Some("Hello".to_string()),
            create_time: Some(Utc.with_ymd_and_hms(2021, 5, 6, 7, 8, 9).unwrap()),
            tags: ["rust".to_string()].into_iter().collect(),
            draft: true,
            ..Default::default()
        };
        let text = compose(&record, "Body\n").unwrap();
        assert!(text.starts_with("+++\n"));
        assert!(text.contains("create_time = 2021-05-06T07:08:09Z"));
        assert!(!text.contains("pagination"));

        let (parsed, body) = parse(&text).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(body, "Body\n");
    }
}
