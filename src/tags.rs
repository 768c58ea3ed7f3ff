//! Tag indexing.
//!
//! Tags are scoped to a directory: the tag index of `/blog` counts every file
//! anywhere below `blog/`, and each tag links to `/blog/tag-<slug>`, which
//! lists those files newest first. Tags are matched by [`url::tag_slug`], so
//! `Rust` and `rust` are one tag, shown with the first spelling met.

use crate::content::{ContentTree, path_to_url, url_to_path};
use crate::listing::{self, newest_first_by_title};
use crate::metadata::{MetadataError, MetadataResolver};
use crate::types::{ContentNode, TagEntry};
use crate::url;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Usage count of every tag below the directory at clean URL `scope_url`,
/// sorted by name case-insensitively.
pub fn index_tags<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    scope_url: &str,
    include_drafts: bool,
) -> Result<Vec<TagEntry>, MetadataError> {
    let mut counts: BTreeMap<String, TagEntry> = BTreeMap::new();
    for path in files_below(resolver, scope_url)? {
        let resolved = resolver.resolve(&path)?;
        if resolved.meta.draft && !include_drafts {
            continue;
        }
        for tag in &resolved.meta.tags {
            counts
                .entry(url::tag_slug(tag))
                .or_insert_with(|| TagEntry {
                    name: tag.clone(),
                    url: url::href(&url::tag_url(scope_url, tag)),
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut tags: Vec<TagEntry> = counts.into_values().collect();
    tags.sort_by_key(|tag| tag.name.to_lowercase());
    Ok(tags)
}

/// Whether any of `tags` is the tag whose slug is `slug`.
pub fn has_tag<'a>(tags: impl IntoIterator<Item = &'a String>, slug: &str) -> bool {
    let slug = url::tag_slug(slug);
    tags.into_iter().any(|tag| url::tag_slug(tag) == slug)
}

/// Every visible file below `scope_url` carrying `tag` (a name or its slug),
/// newest first.
pub fn tagged_files<T: ContentTree>(
    resolver: &mut MetadataResolver<T>,
    scope_url: &str,
    tag: &str,
    include_drafts: bool,
) -> Result<Vec<ContentNode>, MetadataError> {
    let root = resolver.tree().root().to_path_buf();
    let mut files = Vec::new();
    for path in files_below(resolver, scope_url)? {
        if !has_tag(&resolver.resolve(&path)?.meta.tags, tag) {
            continue;
        }
        let Some(clean_url) = path_to_url(&root, &path) else {
            continue;
        };
        if let Some(node) = listing::file_node(resolver, &path, &clean_url, include_drafts)? {
            files.push(node);
        }
    }
    files.sort_by(newest_first_by_title);
    Ok(files)
}

fn files_below<T: ContentTree>(
    resolver: &MetadataResolver<T>,
    scope_url: &str,
) -> Result<Vec<PathBuf>, MetadataError> {
    let dir = url_to_path(resolver.tree().root(), scope_url);
    resolver
        .tree()
        .markdown_files(&dir)
        .map_err(|source| MetadataError::Io { path: dir, source })
}
