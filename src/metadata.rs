//! Metadata resolution with inheritance through ancestor `_index.md` files.
//!
//! A content file's front matter rarely says everything. The presentation
//! fields (`theme`, the three template names and `pagination`) are usually
//! set once near the top of the tree and inherited downwards:
//!
//! ```text
//! content/_index.md            theme = "paper", pagination = 10
//! content/blog/_index.md       file_template = "post"
//! content/blog/hello.md        (nothing)
//!
//! resolve(blog/hello.md) → theme "paper", file_template "post", pagination 10
//! ```
//!
//! ## Resolution order
//!
//! 1. The file's own front matter.
//! 2. The `_index.md` of the directory containing it (for an `_index.md`, the
//!    directory above), then each directory further up, up to and including
//!    the content root. A missing `_index.md` is skipped.
//!
//! A field is only ever filled while it is still unspecified, so the nearest
//! ancestor that sets it wins. The walk stops early once every inheritable
//! field is set. Descriptive fields (title, author, tags, …) are never
//! inherited.
//!
//! ## Title fallback
//!
//! A file without a `title` is named after its file stem; an `_index.md`
//! without one is named after its directory.
//!
//! ## Caching
//!
//! Resolved metadata and rendered bodies are memoized per path for the
//! lifetime of one [`MetadataResolver`], i.e. one build. Raw ancestor records
//! are cached too, so an `_index.md` is parsed once however many files
//! inherit from it.

use crate::content::{ContentTree, INDEX_FILE, is_index};
use crate::front_matter::{self, ContentRecord, FrontMatterError};
use crate::markdown;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },
}

/// The three page layouts, each with its own overridable template name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Directory,
    File,
    TagFiles,
}

impl TemplateKind {
    /// Template used when no record in the ancestry names one.
    pub fn default_name(self) -> &'static str {
        match self {
            TemplateKind::Directory => "directory",
            TemplateKind::File => "file",
            TemplateKind::TagFiles => "tagfiles",
        }
    }
}

/// A content record after inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMetadata {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub tags: BTreeSet<String>,
    pub draft: bool,
    pub theme: Option<String>,
    pub dir_template: Option<String>,
    pub file_template: Option<String>,
    pub tag_files_template: Option<String>,
    pub pagination: Option<i64>,
}

impl ResolvedMetadata {
    fn from_record(record: ContentRecord, fallback_title: String) -> Self {
        Self {
            title: record.title.unwrap_or(fallback_title),
            description: record.description,
            author: record.author,
            create_time: record.create_time,
            update_time: record.update_time,
            tags: record.tags,
            draft: record.draft,
            theme: record.theme,
            dir_template: record.dir_template,
            file_template: record.file_template,
            tag_files_template: record.tag_files_template,
            pagination: record.pagination,
        }
    }

    /// Time used for ordering: update time, else create time.
    pub fn effective_time(&self) -> Option<DateTime<Utc>> {
        self.update_time.or(self.create_time)
    }

    /// Items per listing page; zero or less disables pagination.
    pub fn page_size(&self) -> i64 {
        self.pagination.unwrap_or(0)
    }

    /// Template name for a page layout, falling back to the stock name.
    pub fn template(&self, kind: TemplateKind) -> &str {
        let name = match kind {
            TemplateKind::Directory => &self.dir_template,
            TemplateKind::File => &self.file_template,
            TemplateKind::TagFiles => &self.tag_files_template,
        };
        name.as_deref().unwrap_or(kind.default_name())
    }

    fn inheritance_complete(&self) -> bool {
        self.theme.is_some()
            && self.dir_template.is_some()
            && self.file_template.is_some()
            && self.tag_files_template.is_some()
            && self.pagination.is_some()
    }

    fn inherit_from(&mut self, ancestor: &ContentRecord) {
        fill(&mut self.theme, &ancestor.theme);
        fill(&mut self.dir_template, &ancestor.dir_template);
        fill(&mut self.file_template, &ancestor.file_template);
        fill(&mut self.tag_files_template, &ancestor.tag_files_template);
        fill(&mut self.pagination, &ancestor.pagination);
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, inherited: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(inherited);
    }
}

/// Resolved metadata plus the rendered HTML body of one content file.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub meta: Arc<ResolvedMetadata>,
    pub body: Arc<str>,
}

/// Hit/miss counters of a [`MetadataCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hits, {} misses", self.hits, self.misses)
    }
}

/// Per-build memo of resolved files and raw ancestor records.
#[derive(Debug, Default)]
pub struct MetadataCache {
    resolved: HashMap<PathBuf, Resolved>,
    records: HashMap<PathBuf, Arc<ContentRecord>>,
    stats: CacheStats,
}

impl MetadataCache {
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.resolved.clear();
        self.records.clear();
        self.stats = CacheStats::default();
    }
}

/// Resolves content files against a [`ContentTree`].
pub struct MetadataResolver<T> {
    tree: T,
    cache: MetadataCache,
    cache_enabled: bool,
}

impl<T: ContentTree> MetadataResolver<T> {
    pub fn new(tree: T, cache_enabled: bool) -> Self {
        Self {
            tree,
            cache: MetadataCache::default(),
            cache_enabled,
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop everything memoized so far.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolve the metadata and rendered body of the content file at `path`.
    ///
    /// A missing file (typically a directory without `_index.md`) resolves to
    /// an empty record with the fallback title and an empty body. Unreadable
    /// or malformed files, including malformed ancestors, are errors.
    pub fn resolve(&mut self, path: &Path) -> Result<Resolved, MetadataError> {
        if self.cache_enabled
            && let Some(hit) = self.cache.resolved.get(path)
        {
            self.cache.stats.hits += 1;
            return Ok(hit.clone());
        }
        self.cache.stats.misses += 1;

        let (record, body) = self.load(path)?;
        let mut meta = ResolvedMetadata::from_record(record, self.fallback_title(path));

        let root = self.tree.root().to_path_buf();
        let mut dir = if is_index(path) {
            path.parent().and_then(Path::parent)
        } else {
            path.parent()
        };

        while let Some(current) = dir {
            if meta.inheritance_complete() || !current.starts_with(&root) {
                break;
            }
            let index = current.join(INDEX_FILE);
            if self.tree.is_file(&index) {
                let ancestor = self.record(&index)?;
                meta.inherit_from(&ancestor);
            }
            if current == root {
                break;
            }
            dir = current.parent();
        }

        tracing::debug!(path = %path.display(), title = %meta.title, "resolved metadata");

        let resolved = Resolved {
            meta: Arc::new(meta),
            body: markdown::render_html(&body).into(),
        };
        if self.cache_enabled {
            self.cache
                .resolved
                .insert(path.to_path_buf(), resolved.clone());
        }
        Ok(resolved)
    }

    /// Own front matter of `path` without inheritance, memoized.
    fn record(&mut self, path: &Path) -> Result<Arc<ContentRecord>, MetadataError> {
        if self.cache_enabled
            && let Some(record) = self.cache.records.get(path)
        {
            return Ok(Arc::clone(record));
        }
        let (record, _) = self.load(path)?;
        let record = Arc::new(record);
        if self.cache_enabled {
            self.cache
                .records
                .insert(path.to_path_buf(), Arc::clone(&record));
        }
        Ok(record)
    }

    fn load(&self, path: &Path) -> Result<(ContentRecord, String), MetadataError> {
        if !self.tree.is_file(path) {
            return Ok((ContentRecord::default(), String::new()));
        }
        let source = self
            .tree
            .read_to_string(path)
            .map_err(|source| MetadataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        front_matter::parse(&source).map_err(|source| MetadataError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })
    }

    fn fallback_title(&self, path: &Path) -> String {
        let named = if is_index(path) {
            path.parent().and_then(Path::file_name)
        } else {
            path.file_stem()
        };
        named
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
