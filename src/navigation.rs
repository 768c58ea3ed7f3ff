//! Navigation aids for a page: its path trail and its neighbors.

use crate::content::{ContentTree, INDEX_FILE, url_to_path};
use crate::metadata::{MetadataError, MetadataResolver};
use crate::types::ContentNode;
use crate::url;

/// Position of a file within its directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siblings {
    /// Index of the file in the merged listing.
    pub index: Option<usize>,
    /// Entry before the file (newer).
    pub prev: Option<ContentNode>,
    /// Entry after the file (older).
    pub next: Option<ContentNode>,
}

/// Neighbors of the file at rooted `url` in a merged listing.
///
/// A neighbor that is a directory counts as no neighbor.
pub fn siblings(listing: &[ContentNode], url: &str) -> Siblings {
    let Some(index) = listing.iter().position(|node| !node.is_dir && node.url == url) else {
        return Siblings::default();
    };
    let file_at = |i: usize| listing.get(i).filter(|node| !node.is_dir).cloned();
    Siblings {
        index: Some(index),
        prev: index.checked_sub(1).and_then(file_at),
        next: file_at(index + 1),
    }
}

/// Directory nodes from the content root down to the directory at clean
/// URL `dir_url`, inclusive.
pub fn ancestor_trail<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    dir_url: &str,
) -> Result<Vec<ContentNode>, MetadataError> {
    let mut trail = Vec::new();
    let mut current = dir_url;
    loop {
        let index = url_to_path(resolver.tree().root(), current).join(INDEX_FILE);
        let resolved = resolver.resolve(&index)?;
        trail.push(ContentNode {
            url: url::href(current),
            title: resolved.meta.title.clone(),
            description: resolved.meta.description.clone(),
            is_dir: true,
            time: None,
            child_count: 0,
        });
        if current.is_empty() {
            break;
        }
        current = url::parent(current);
    }
    trail.reverse();
    Ok(trail)
}
