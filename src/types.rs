//! Shared types handed from the builders to the template renderer.
//!
//! Everything here is `Serialize`: the tera theme sees these records as its
//! template context and `boom inspect` prints them as JSON. URLs inside these
//! records are rooted (`/blog/post`); the engine's clean form only appears in
//! build children.

use crate::metadata::ResolvedMetadata;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of a listing or path trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_dir: bool,
    /// Update time, else create time. Files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    /// Visible children one level down. Directories only.
    pub child_count: usize,
}

/// A tag with its listing URL and its usage count within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
    pub url: String,
    pub count: usize,
}

/// Where a listing page sits among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current: usize,
    pub max: usize,
    pub page_size: i64,
}

/// Template data of a directory page.
#[derive(Debug, Clone, Serialize)]
pub struct DirData {
    pub url: String,
    pub meta: ResolvedMetadata,
    /// Rendered `_index.md` body; empty for a hidden draft index.
    pub content: String,
    pub trail: Vec<ContentNode>,
    /// Listing entries on the current page.
    pub items: Vec<ContentNode>,
    /// Tags used anywhere below this directory.
    pub tags: Vec<TagEntry>,
    pub page: PageInfo,
}

/// Template data of a single content file.
#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    pub url: String,
    pub meta: ResolvedMetadata,
    pub content: String,
    pub trail: Vec<ContentNode>,
    /// The file's own tags, name-sorted, linking into its directory's scope.
    pub tags: Vec<TagEntry>,
    /// Newer neighbor in the directory listing.
    pub prev: Option<ContentNode>,
    /// Older neighbor in the directory listing.
    pub next: Option<ContentNode>,
    /// Rooted URL of the directory listing page that shows this file.
    pub dir_url: String,
    /// That listing page's entries, this file among them.
    pub items: Vec<ContentNode>,
    pub page: PageInfo,
}

/// Template data of a tag listing.
#[derive(Debug, Clone, Serialize)]
pub struct TagFilesData {
    pub url: String,
    pub tag: String,
    /// Metadata of the scope directory.
    pub meta: ResolvedMetadata,
    pub trail: Vec<ContentNode>,
    pub files: Vec<ContentNode>,
    pub page: PageInfo,
}

/// Template data of any page kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageData {
    Dir(DirData),
    File(FileData),
    TagFiles(TagFilesData),
}

impl PageData {
    pub fn url(&self) -> &str {
        match self {
            PageData::Dir(data) => &data.url,
            PageData::File(data) => &data.url,
            PageData::TagFiles(data) => &data.url,
        }
    }

    pub fn meta(&self) -> &ResolvedMetadata {
        match self {
            PageData::Dir(data) => &data.meta,
            PageData::File(data) => &data.meta,
            PageData::TagFiles(data) => &data.meta,
        }
    }

    /// Title shown in the document head.
    pub fn title(&self) -> String {
        match self {
            PageData::TagFiles(data) => format!("#{} · {}", data.tag, data.meta.title),
            other => other.meta().title.clone(),
        }
    }
}
