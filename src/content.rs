//! Read access to the content tree.
//!
//! Every file-system question the engine asks goes through [`ContentTree`], so
//! the resolver, aggregators and builders can run against an in-memory tree in
//! tests and against [`FsContentTree`] in production. Paths handed to a tree
//! are always `root().join(...)` paths.
//!
//! ## Layout
//!
//! ```text
//! content/
//! ├── _index.md            # root metadata (inherited by everything)
//! ├── about.md             # file page: /about
//! └── blog/
//!     ├── _index.md        # directory metadata: /blog
//!     ├── hello-world.md   # file page: /blog/hello-world
//!     └── archive/
//!         └── retro.md     # /blog/archive/retro
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the file carrying a directory's own metadata and body.
pub const INDEX_FILE: &str = "_index.md";

/// Extension of content files.
pub const MARKDOWN_EXT: &str = "md";

/// A direct child of a content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    /// Whether this entry is a content file other than the index.
    pub fn is_content_file(&self) -> bool {
        !self.is_dir && is_markdown(&self.name) && self.name != INDEX_FILE
    }
}

/// File-system view of a content tree.
pub trait ContentTree {
    /// The content root. Inheritance and path trails never look above it.
    fn root(&self) -> &Path;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Direct children of `dir` sorted by name, hidden entries excluded.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Every content file below `dir`, recursively, sorted by path.
    /// Index files and hidden entries are excluded.
    fn markdown_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Whether a file name has the markdown extension.
pub fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == MARKDOWN_EXT)
}

/// Whether a path names a directory index file.
pub fn is_index(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == INDEX_FILE)
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Map a clean URL onto a path below `root`.
pub fn url_to_path(root: &Path, url: &str) -> PathBuf {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Map a content file path back onto its clean URL: the path relative to
/// `root` with the `.md` extension dropped. Returns `None` outside the root.
pub fn path_to_url(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if let Some(last) = segments.last_mut()
        && last.ends_with(".md")
    {
        last.truncate(last.len() - ".md".len());
    }
    Some(segments.join("/"))
}

/// [`ContentTree`] backed by the real file system.
#[derive(Debug, Clone)]
pub struct FsContentTree {
    root: PathBuf,
}

impl FsContentTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentTree for FsContentTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_hidden(&name) {
                continue;
            }
            let is_dir = entry.path().is_dir();
            entries.push(Entry { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn markdown_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            // The root itself may live in a hidden directory (temp dirs do).
            .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if is_markdown(&name) && name != INDEX_FILE {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
