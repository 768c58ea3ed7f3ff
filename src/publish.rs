//! Writing the built site to disk.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html                 # /
//! ├── 2/index.html               # /2
//! ├── about/index.html           # /about
//! ├── blog/
//! │   ├── index.html             # /blog
//! │   ├── hello/index.html       # /blog/hello
//! │   └── tag-rust/index.html    # /blog/tag-rust
//! ├── assets/…                   # copied from <site>/assets
//! └── themes/paper/style.css     # non-template theme files
//! ```
//!
//! Every URL becomes a directory holding `index.html`, so the clean URLs work
//! on any static file server.

use crate::driver::PageSink;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("refusing to clean {}: it contains {}", output.display(), protected.display())]
    UnsafeOutput { output: PathBuf, protected: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// [`PageSink`] writing `<root>/<url>/index.html`.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a page for clean URL `url` is written to.
    pub fn page_path(&self, url: &str) -> PathBuf {
        url.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
            .join("index.html")
    }
}

impl PageSink for OutputDir {
    fn write_page(&mut self, url: &str, html: &[u8]) -> io::Result<()> {
        let path = self.page_path(url);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)
    }
}

/// Empty the output directory, creating it if needed.
///
/// Fails without touching anything when `output` is, or contains, one of the
/// `protected` directories (the site root, the content directory).
pub fn clean_output(output: &Path, protected: &[&Path]) -> Result<(), PublishError> {
    if output.exists() {
        let canonical_output = output.canonicalize()?;
        for dir in protected {
            let Ok(canonical) = dir.canonicalize() else {
                continue;
            };
            if canonical.starts_with(&canonical_output) {
                return Err(PublishError::UnsafeOutput {
                    output: output.to_path_buf(),
                    protected: dir.to_path_buf(),
                });
            }
        }
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output)?;
    Ok(())
}

/// Copy every file below `src` into `dst` for which `keep` holds, keeping
/// relative paths. Hidden entries are skipped. Returns the number of files
/// copied; a missing `src` copies nothing.
pub fn copy_tree(
    src: &Path,
    dst: &Path,
    keep: impl Fn(&Path) -> bool,
) -> Result<usize, PublishError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut copied = 0;
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !keep(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// Copy the site's static assets to `<output>/assets`.
pub fn copy_assets(assets_dir: &Path, output: &Path) -> Result<usize, PublishError> {
    copy_tree(assets_dir, &output.join("assets"), |_| true)
}

/// Copy non-template theme files (stylesheets, scripts, images) to
/// `<output>/themes`.
pub fn copy_theme_files(themes_dir: &Path, output: &Path) -> Result<usize, PublishError> {
    copy_tree(themes_dir, &output.join("themes"), |path| {
        path.extension().is_none_or(|ext| ext != "html")
    })
}
