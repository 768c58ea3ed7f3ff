//! URL classification: which part of the content tree a request addresses.
//!
//! ```text
//! /blog                 → Directory  blog
//! /blog/3               → Directory  blog, page 3
//! /blog/hello           → File       blog/hello.md
//! /blog/tag-rust        → TagListing blog, tag "rust"
//! /blog/tag-rust/2      → TagListing blog, tag "rust", page 2
//! ```
//!
//! A trailing all-digit segment is always a page number, even when a file of
//! that name exists (`blog/2020.md` cannot be addressed as `/blog/2020`).

use crate::content::{ContentTree, MARKDOWN_EXT, is_hidden, url_to_path};
use crate::url::{self, TAG_MARKER};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("/{0} is not part of site content")]
pub struct NotPartOfContent(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Directory,
    File,
    TagListing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    /// The normalized request, page and tag segments included.
    pub url: String,
    /// The request without page and tag segments.
    pub clean_path: String,
    pub page: Option<usize>,
    pub tag: Option<String>,
    pub kind: ContentKind,
}

impl ClassifiedPath {
    /// The directory (or content file) this request maps onto.
    pub fn fs_path(&self, root: &Path) -> PathBuf {
        match self.kind {
            ContentKind::File => file_path(root, &self.clean_path),
            ContentKind::Directory | ContentKind::TagListing => url_to_path(root, &self.clean_path),
        }
    }
}

fn file_path(root: &Path, clean: &str) -> PathBuf {
    url_to_path(root, &format!("{clean}.{MARKDOWN_EXT}"))
}

/// Classify a requested URL against `tree`.
pub fn classify<T: ContentTree>(tree: &T, requested: &str) -> Result<ClassifiedPath, NotPartOfContent> {
    let url = url::normalize(requested);
    let not_content = || NotPartOfContent(url.clone());

    let mut segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| is_hidden(s)) {
        return Err(not_content());
    }

    let mut page = None;
    if let Some(last) = segments.last()
        && url::is_page_number(last)
    {
        // Overlong numbers clamp to the last page anyway.
        page = Some(last.parse::<usize>().unwrap_or(usize::MAX));
        segments.pop();
    }

    let mut tag = None;
    if let Some(last) = segments.last()
        && let Some(name) = last.strip_prefix(TAG_MARKER)
        && !name.is_empty()
    {
        tag = Some(name.to_string());
        segments.pop();
    }

    let clean_path = segments.join("/");
    let root = tree.root();

    let kind = if tag.is_some() {
        if !tree.is_dir(&url_to_path(root, &clean_path)) {
            return Err(not_content());
        }
        ContentKind::TagListing
    } else if !clean_path.is_empty() && tree.is_file(&file_path(root, &clean_path)) {
        if page.is_some() {
            return Err(not_content());
        }
        ContentKind::File
    } else if tree.is_dir(&url_to_path(root, &clean_path)) {
        ContentKind::Directory
    } else {
        return Err(not_content());
    };

    Ok(ClassifiedPath {
        url,
        clean_path,
        page,
        tag,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MemoryTree;

    fn tree() -> MemoryTree {
        MemoryTree::new()
            .with_file("_index.md", "")
            .with_file("about.md", "")
            .with_file("blog/_index.md", "")
            .with_file("blog/hello.md", "")
            .with_file("blog/2020.md", "")
            .with_dir("blog/archive")
    }

    #[test]
    fn root_is_a_directory() {
        let classified = classify(&tree(), "/").unwrap();
        assert_eq!(classified.kind, ContentKind::Directory);
        assert_eq!(classified.clean_path, "");
        assert_eq!(classified.page, None);
    }

    #[test]
    fn directory_with_page() {
        let classified = classify(&tree(), "/blog/3/").unwrap();
        assert_eq!(classified.kind, ContentKind::Directory);
        assert_eq!(classified.clean_path, "blog");
        assert_eq!(classified.page, Some(3));
        assert_eq!(classified.url, "blog/3");
    }

    #[test]
    fn root_page() {
        let classified = classify(&tree(), "/2").unwrap();
        assert_eq!(classified.kind, ContentKind::Directory);
        assert_eq!(classified.clean_path, "");
        assert_eq!(classified.page, Some(2));
    }

    #[test]
    fn content_file() {
        let tree = tree();
        let classified = classify(&tree, "blog/hello#").unwrap();
        assert_eq!(classified.kind, ContentKind::File);
        assert_eq!(classified.fs_path(tree.root()), tree.path("blog/hello.md"));
    }

    #[test]
    fn directory_without_index() {
        let classified = classify(&tree(), "blog/archive").unwrap();
        assert_eq!(classified.kind, ContentKind::Directory);
    }

    #[test]
    fn tag_listing_with_and_without_page() {
        let classified = classify(&tree(), "/blog/tag-rust").unwrap();
        assert_eq!(classified.kind, ContentKind::TagListing);
        assert_eq!(classified.clean_path, "blog");
        assert_eq!(classified.tag.as_deref(), Some("rust"));

        let classified = classify(&tree(), "/tag-rust/2").unwrap();
        assert_eq!(classified.kind, ContentKind::TagListing);
        assert_eq!(classified.clean_path, "");
        assert_eq!(classified.page, Some(2));
    }

    #[test]
    fn tag_scope_must_be_a_directory() {
        assert!(classify(&tree(), "/about/tag-rust").is_err());
        assert!(classify(&tree(), "/nope/tag-rust").is_err());
    }

    #[test]
    fn numeric_suffix_wins_over_numeric_file() {
        let classified = classify(&tree(), "/blog/2020").unwrap();
        assert_eq!(classified.kind, ContentKind::Directory);
        assert_eq!(classified.page, Some(2020));
    }

    #[test]
    fn missing_content_rejected() {
        let err = classify(&tree(), "blog/missing-post").unwrap_err();
        assert_eq!(err, NotPartOfContent("blog/missing-post".to_string()));
    }

    #[test]
    fn paged_file_rejected() {
        assert!(classify(&tree(), "blog/hello/2").is_err());
    }

    #[test]
    fn dot_segments_rejected() {
        assert!(classify(&tree(), "blog/../about").is_err());
        assert!(classify(&tree(), "./blog").is_err());
        assert!(classify(&tree(), "blog/.hidden").is_err());
    }
}
