//! Creating and updating content files from the command line.
//!
//! `boom new blog/hello --title "Hello" --tag rust` writes
//! `content/blog/hello.md` with a fresh front-matter block, or rewrites the
//! block of an existing file while keeping its body. A path naming a directory
//! targets that directory's `_index.md`.

use crate::content::{INDEX_FILE, MARKDOWN_EXT};
use crate::front_matter::{self, ContentRecord, FrontMatterError};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{0} is outside the content directory")]
    OutsideContent(String),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Front-matter values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct MetadataEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub draft: bool,
}

/// Content file addressed by `rel` inside `content_dir`.
///
/// `blog` (an existing directory) → `blog/_index.md`; `blog/hello` and
/// `blog/hello.md` → `blog/hello.md`.
pub fn target_path(content_dir: &Path, rel: &str) -> Result<PathBuf, ScaffoldError> {
    let relative = Path::new(rel.trim_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ScaffoldError::OutsideContent(rel.to_string()));
    }

    let path = content_dir.join(relative);
    if path.is_dir() {
        return Ok(path.join(INDEX_FILE));
    }
    if path.extension().is_some_and(|ext| ext == MARKDOWN_EXT) {
        return Ok(path);
    }
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(MARKDOWN_EXT);
    Ok(path.with_file_name(name))
}

/// Apply `edit` to `record`.
///
/// Given values replace existing ones and tags are added. A record without a
/// create time gets `now` for both times; otherwise its update time is bumped.
pub fn apply(record: &mut ContentRecord, edit: &MetadataEdit, now: DateTime<Utc>) {
    if edit.title.is_some() {
        record.title.clone_from(&edit.title);
    }
    if edit.description.is_some() {
        record.description.clone_from(&edit.description);
    }
    if edit.author.is_some() {
        record.author.clone_from(&edit.author);
    }
    record.tags.extend(
        edit.tags
            .iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty()),
    );
    if edit.draft {
        record.draft = true;
    }

    record.create_time.get_or_insert(now);
    record.update_time = Some(now);
}

/// Create or update the content file at `path`. Returns the final record.
pub fn write_metadata(
    path: &Path,
    edit: &MetadataEdit,
    now: DateTime<Utc>,
) -> Result<ContentRecord, ScaffoldError> {
    let existed = path.is_file();
    let (mut record, body) = if existed {
        front_matter::parse(&fs::read_to_string(path)?)?
    } else {
        (ContentRecord::default(), String::new())
    };

    apply(&mut record, edit, now);
    front_matter::check_tags(&record)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, front_matter::compose(&record, &body)?)?;
    tracing::debug!(path = %path.display(), existed, "wrote metadata");
    Ok(record)
}
