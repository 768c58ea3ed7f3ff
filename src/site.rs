//! A site on disk: configuration plus the pipelines the CLI runs.
//!
//! ```text
//! build    clean output → traverse from "/" → write pages → copy assets/themes
//! check    traverse from "/" rendering into memory
//! inspect  prepare one URL and return its template data
//! new      create or update one content file's front matter
//! ```

use crate::builder::{BuildError, BuildOptions, Builder, Prepared, SkipReason};
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::FsContentTree;
use crate::driver::{BuildDriver, BuildReport, MemorySink};
use crate::front_matter::ContentRecord;
use crate::metadata::MetadataResolver;
use crate::publish::{self, OutputDir, PublishError};
use crate::render::ThemeRenderer;
use crate::scaffold::{self, MetadataEdit, ScaffoldError};
use crate::types::PageData;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("content directory not found: {}", .0.display())]
    MissingContent(PathBuf),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
}

/// Result of a full build.
#[derive(Debug, Clone)]
pub struct SiteReport {
    pub pages: BuildReport,
    pub assets: usize,
    pub theme_files: usize,
    pub output: PathBuf,
}

/// Template data of one URL, as printed by `boom inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub url: String,
    /// `None` when the URL is a draft and drafts are excluded.
    pub skipped: Option<String>,
    pub theme: Option<String>,
    pub template: Option<String>,
    pub children: Vec<String>,
    pub data: Option<PageData>,
}

#[derive(Debug, Clone)]
pub struct Site {
    root: PathBuf,
    config: SiteConfig,
}

impl Site {
    /// Load `boom.toml` (if any) from `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SiteError> {
        let root = root.into();
        let config = config::load_config(&root)?;
        Self::with_config(root, config)
    }

    pub fn with_config(root: impl Into<PathBuf>, config: SiteConfig) -> Result<Self, SiteError> {
        let root = root.into();
        config.validate()?;
        let content = config.content_path(&root);
        if !content.is_dir() {
            return Err(SiteError::MissingContent(content));
        }
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SiteConfig {
        &mut self.config
    }

    pub fn content_path(&self) -> PathBuf {
        self.config.content_path(&self.root)
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }

    fn builder(&self) -> Builder<FsContentTree, ThemeRenderer> {
        let cache = self.config.build.cache;
        Builder::new(
            MetadataResolver::new(FsContentTree::new(self.content_path()), cache),
            ThemeRenderer::new(self.config.themes_path(&self.root), cache),
            BuildOptions {
                include_drafts: self.config.build.drafts,
                minify: self.config.build.minify,
            },
        )
    }

    /// Build the whole site into the output directory.
    pub fn build(&self) -> Result<SiteReport, SiteError> {
        let output = self.output_path();
        let content = self.content_path();
        publish::clean_output(&output, &[self.root.as_path(), content.as_path()])?;
        tracing::info!(output = %output.display(), "building site");

        let mut driver = BuildDriver::new(self.builder(), OutputDir::new(&output));
        let pages = driver.run("")?;

        let assets = publish::copy_assets(&self.config.assets_path(&self.root), &output)?;
        let theme_files = publish::copy_theme_files(&self.config.themes_path(&self.root), &output)?;
        tracing::info!(
            pages = pages.built.len(),
            skipped = pages.skipped.len(),
            assets,
            theme_files,
            cache = %pages.cache,
            "build complete"
        );

        Ok(SiteReport {
            pages,
            assets,
            theme_files,
            output,
        })
    }

    /// Traverse and render every page without writing anything.
    pub fn check(&self) -> Result<BuildReport, SiteError> {
        tracing::info!(content = %self.content_path().display(), "checking site");
        let mut driver = BuildDriver::new(self.builder(), MemorySink::default());
        Ok(driver.run("")?)
    }

    /// Template data for a single URL.
    pub fn inspect(&self, url: &str) -> Result<Inspection, SiteError> {
        let prepared = self.builder().prepare(url)?;
        let url = crate::url::href(&crate::url::normalize(url));
        Ok(match prepared {
            Prepared::Page(plan) => Inspection {
                url,
                skipped: None,
                theme: plan.theme,
                template: Some(plan.template),
                children: plan.children.iter().map(|c| crate::url::href(c)).collect(),
                data: Some(plan.data),
            },
            Prepared::Skipped(reason) => Inspection {
                url,
                skipped: Some(skip_label(reason).to_string()),
                theme: None,
                template: None,
                children: Vec::new(),
                data: None,
            },
        })
    }

    /// Create or update the content file addressed by `path`, relative to the
    /// content directory. Returns the file written and its front matter.
    pub fn new_content(
        &self,
        path: &str,
        edit: &MetadataEdit,
        now: DateTime<Utc>,
    ) -> Result<(PathBuf, ContentRecord), SiteError> {
        let target = scaffold::target_path(&self.content_path(), path)?;
        let record = scaffold::write_metadata(&target, edit, now)?;
        tracing::info!(path = %target.display(), "wrote front matter");
        Ok((target, record))
    }
}

pub fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Draft => "draft",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_fixtures;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn small_site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "content/_index.md", "+++\ntitle = \"Home\"\n+++\nWelcome\n");
        write(
            root,
            "content/hello.md",
            "+++\ntitle = \"Hello\"\ntags = [\"intro\"]\n+++\n# Hi\n",
        );
        write(root, "content/draft.md", "+++\ntitle = \"Soon\"\ndraft = true\n+++\n");
        write(root, "assets/logo.txt", "logo");
        tmp
    }

    #[test]
    fn open_requires_content_dir() {
        let tmp = TempDir::new().unwrap();
        let err = Site::open(tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::MissingContent(_)));
    }

    #[test]
    fn build_writes_pages_and_assets() {
        let tmp = small_site();
        let site = Site::open(tmp.path()).unwrap();
        let report = site.build().unwrap();

        let out = tmp.path().join("public");
        assert_eq!(report.output, out);
        assert!(out.join("index.html").is_file());
        assert!(out.join("hello/index.html").is_file());
        assert!(out.join("tag-intro/index.html").is_file());
        assert!(!out.join("draft").exists());
        assert_eq!(report.assets, 1);
        assert_eq!(fs::read_to_string(out.join("assets/logo.txt")).unwrap(), "logo");
    }

    #[test]
    fn build_cleans_stale_output() {
        let tmp = small_site();
        write(tmp.path(), "public/stale/index.html", "old");
        Site::open(tmp.path()).unwrap().build().unwrap();
        assert!(!tmp.path().join("public/stale").exists());
    }

    #[test]
    fn drafts_config_builds_drafts() {
        let tmp = small_site();
        write(tmp.path(), config::CONFIG_FILE, "[build]\ndrafts = true\n");
        let report = Site::open(tmp.path()).unwrap().build().unwrap();
        assert!(report.pages.built.contains(&"draft".to_string()));
    }

    #[test]
    fn check_writes_nothing() {
        let tmp = small_site();
        let report = Site::open(tmp.path()).unwrap().check().unwrap();
        assert!(report.built.contains(&"hello".to_string()));
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn inspect_reports_page_data() {
        let tmp = small_site();
        let site = Site::open(tmp.path()).unwrap();

        let page = site.inspect("/hello").unwrap();
        assert_eq!(page.url, "/hello");
        assert_eq!(page.template.as_deref(), Some("file"));
        assert_eq!(page.data.as_ref().unwrap().title(), "Hello");

        let draft = site.inspect("draft").unwrap();
        assert_eq!(draft.skipped.as_deref(), Some("draft"));
        assert!(draft.data.is_none());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"]["meta"]["title"], "Hello");
    }

    #[test]
    fn inspect_unknown_url_fails() {
        let tmp = small_site();
        let err = Site::open(tmp.path()).unwrap().inspect("/nope").unwrap_err();
        assert!(matches!(err, SiteError::Build(BuildError::NotPartOfContent(_))));
    }

    #[test]
    fn fixture_theme_and_pagination_inherited() {
        let tmp = setup_fixtures();
        let site = Site::open(tmp.path()).unwrap();

        let file = site.inspect("/blog/archive/retrospective").unwrap();
        assert_eq!(file.theme.as_deref(), Some("paper"));
        assert!(file.children.is_empty());

        let blog = site.inspect("/blog").unwrap();
        assert_eq!(blog.children.first().map(String::as_str), Some("/blog/archive"));
        assert!(blog.children.contains(&"/blog/tag-rust".to_string()));
        assert!(blog.children.contains(&"/blog/2".to_string()));
        let json = serde_json::to_value(&blog).unwrap();
        assert_eq!(json["data"]["page"]["page_size"], 3);
    }

    #[test]
    fn new_content_lands_in_content_dir() {
        let tmp = small_site();
        let site = Site::open(tmp.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let edit = MetadataEdit {
            title: Some("Fresh".to_string()),
            ..Default::default()
        };

        let (path, record) = site.new_content("notes/fresh", &edit, now).unwrap();
        assert_eq!(path, tmp.path().join("content/notes/fresh.md"));
        assert_eq!(record.create_time, Some(now));
        assert!(site.inspect("/notes/fresh").is_ok());
    }
}
