//! Directory listings.
//!
//! A directory page lists its direct children: sub-directories first, sorted
//! by title (case-insensitive), then content files, newest first with undated
//! files last. Titles come from each child's resolved metadata, so a
//! sub-directory shows the title of its `_index.md`.

use crate::content::{ContentTree, Entry, INDEX_FILE, url_to_path};
use crate::metadata::{MetadataError, MetadataResolver};
use crate::types::ContentNode;
use crate::url;
use std::cmp::Ordering;
use std::path::Path;

/// Merged listing of the directory at clean URL `dir_url`.
pub fn aggregate<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    dir_url: &str,
    include_drafts: bool,
) -> Result<Vec<ContentNode>, MetadataError> {
    let dir = url_to_path(resolver.tree().root(), dir_url);
    let entries = list(resolver, &dir)?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        let path = dir.join(&entry.name);
        if entry.is_dir {
            let child_url = url::join(dir_url, &entry.name);
            dirs.push(dir_node(resolver, &path, &child_url, include_drafts)?);
        } else if entry.is_content_file() {
            let stem = entry.name.strip_suffix(".md").unwrap_or(&entry.name);
            let child_url = url::join(dir_url, stem);
            if let Some(node) = file_node(resolver, &path, &child_url, include_drafts)? {
                files.push(node);
            }
        }
    }

    dirs.sort_by_key(|node| node.title.to_lowercase());
    files.sort_by(newest_first);

    dirs.extend(files);
    Ok(dirs)
}

/// Listing node for the content file at `path`, or `None` for a hidden draft.
pub fn file_node<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    path: &Path,
    clean_url: &str,
    include_drafts: bool,
) -> Result<Option<ContentNode>, MetadataError> {
    let resolved = resolver.resolve(path)?;
    let meta = &resolved.meta;
    if meta.draft && !include_drafts {
        return Ok(None);
    }
    Ok(Some(ContentNode {
        url: url::href(clean_url),
        title: meta.title.clone(),
        description: meta.description.clone(),
        is_dir: false,
        time: meta.effective_time(),
        child_count: 0,
    }))
}

/// Listing node for the sub-directory at `path`.
pub fn dir_node<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    path: &Path,
    clean_url: &str,
    include_drafts: bool,
) -> Result<ContentNode, MetadataError> {
    let resolved = resolver.resolve(&path.join(INDEX_FILE))?;

    let mut child_count = 0;
    for entry in list(resolver, path)? {
        if entry.is_dir {
            child_count += 1;
        } else if entry.is_content_file() {
            let child = resolver.resolve(&path.join(&entry.name))?;
            if include_drafts || !child.meta.draft {
                child_count += 1;
            }
        }
    }

    Ok(ContentNode {
        url: url::href(clean_url),
        title: resolved.meta.title.clone(),
        description: resolved.meta.description.clone(),
        is_dir: true,
        time: None,
        child_count,
    })
}

/// Newest first, undated last.
pub fn newest_first(a: &ContentNode, b: &ContentNode) -> Ordering {
    b.time.cmp(&a.time)
}

/// Newest first, ties broken by title ascending (case-insensitive).
pub fn newest_first_by_title(a: &ContentNode, b: &ContentNode) -> Ordering {
    newest_first(a, b).then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

fn list<T: ContentTree>(
    resolver: &MetadataResolver<T>,
    dir: &Path,
) -> Result<Vec<Entry>, MetadataError> {
    resolver
        .tree()
        .list_dir(dir)
        .map_err(|source| MetadataError::Io {
            path: dir.to_path_buf(),
            source,
        })
}
