//! Shared test utilities for the boom test suite.
//!
//! Provides an in-memory [`ContentTree`], a front-matter builder, fixture
//! setup and listing extractors.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = MemoryTree::new()
//!     .with_file("_index.md", &page("pagination = 10", ""))
//!     .with_file("blog/hello.md", &page("title = \"Hello\"", "Body"));
//!
//! let mut resolver = MetadataResolver::new(tree, true);
//! let listing = aggregate(&mut resolver, "blog", false).unwrap();
//! assert_eq!(listing_titles(&listing), vec!["Hello"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::content::{ContentTree, Entry, INDEX_FILE, is_hidden, is_markdown};
use crate::metadata::ResolvedMetadata;
use crate::render::{RenderError, TemplateRenderer};
use crate::types::{ContentNode, PageData};

// =========================================================================
// In-memory content tree
// =========================================================================

/// A [`ContentTree`] held entirely in memory, rooted at `/content`.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: PathBuf,
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryTree {
    pub fn new() -> Self {
        let root = PathBuf::from("/content");
        let mut dirs = BTreeSet::new();
        dirs.insert(root.clone());
        Self {
            root,
            files: BTreeMap::new(),
            dirs,
        }
    }

    /// Add a file at `rel` (relative to the root), creating parent dirs.
    pub fn with_file(mut self, rel: &str, content: &str) -> Self {
        let path = self.path(rel);
        self.add_parents(&path);
        self.files.insert(path, content.to_string());
        self
    }

    /// Add an empty directory at `rel`.
    pub fn with_dir(mut self, rel: &str) -> Self {
        let path = self.path(rel);
        self.add_parents(&path);
        self.dirs.insert(path);
        self
    }

    /// Absolute path of `rel` inside this tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |p, s| p.join(s))
    }

    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if !dir.starts_with(&self.root) {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        if !self.is_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                dir.display().to_string(),
            ));
        }
        let name_of = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
        let dirs = self
            .dirs
            .iter()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| name_of(p).map(|name| Entry { name, is_dir: true }));
        let files = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| name_of(p).map(|name| Entry { name, is_dir: false }));

        let mut entries: Vec<Entry> = dirs.chain(files).filter(|e| !is_hidden(&e.name)).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn markdown_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(dir) && p.as_path() != dir)
            .filter(|p| {
                p.strip_prefix(dir)
                    .map(|rel| {
                        rel.components()
                            .all(|c| !is_hidden(&c.as_os_str().to_string_lossy()))
                    })
                    .unwrap_or(false)
            })
            .filter(|p| {
                let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                is_markdown(&name) && name != INDEX_FILE
            })
            .cloned()
            .collect())
    }
}

/// A content file with a `+++` front-matter block.
pub fn page(meta: &str, body: &str) -> String {
    format!("+++\n{meta}\n+++\n{body}")
}

/// Resolved metadata with only a title set.
pub fn resolved_meta(title: &str) -> ResolvedMetadata {
    ResolvedMetadata {
        title: title.to_string(),
        description: None,
        author: None,
        create_time: None,
        update_time: None,
        tags: Default::default(),
        draft: false,
        theme: None,
        dir_template: None,
        file_template: None,
        tag_files_template: None,
        pagination: None,
    }
}

// =========================================================================
// Mock renderer
// =========================================================================

/// One recorded [`TemplateRenderer::render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub url: String,
    pub theme: Option<String>,
    pub template: String,
}

/// Records every render call and returns `<template>url` as the page body.
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub calls: Vec<RenderCall>,
}

impl TemplateRenderer for MockRenderer {
    fn render(
        &mut self,
        data: &PageData,
        theme: Option<&str>,
        template: &str,
    ) -> Result<Vec<u8>, RenderError> {
        self.calls.push(RenderCall {
            url: data.url().to_string(),
            theme: theme.map(str::to_string),
            template: template.to_string(),
        });
        Ok(format!("<{template}>{}", data.url()).into_bytes())
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Fresh copy of `fixtures/site/` in a temp directory, safe to build into.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in WalkDir::new(&fixtures) {
        let entry = entry.unwrap();
        let target = tmp.path().join(entry.path().strip_prefix(&fixtures).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
    tmp
}

// =========================================================================
// Listing extractors
// =========================================================================

/// All node titles in listing order.
pub fn listing_titles(nodes: &[ContentNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.title.as_str()).collect()
}

/// All node URLs in listing order.
pub fn listing_urls(nodes: &[ContentNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.url.as_str()).collect()
}

/// Find a node by title. Panics if not found.
pub fn find_node<'a>(nodes: &'a [ContentNode], title: &str) -> &'a ContentNode {
    nodes.iter().find(|n| n.title == title).unwrap_or_else(|| {
        let titles = listing_titles(nodes);
        panic!("node '{title}' not found. Available: {titles:?}")
    })
}
