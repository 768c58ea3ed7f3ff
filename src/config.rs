//! `boom.toml`: where a site keeps its content, themes, assets and output.
//!
//! Handles loading, validating, and merging the optional `boom.toml` at the
//! site root. Stock defaults are the base layer; the file only needs the keys
//! it wants to override, and command-line flags override both.
//!
//! ## Site Layout
//!
//! ```text
//! my-site/
//! ├── boom.toml        # optional, this file
//! ├── content/         # markdown tree
//! ├── themes/          # tera themes, one directory each
//! ├── assets/          # copied verbatim to public/assets
//! └── public/          # build output (cleaned on every build)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # Every key is optional; the values below are the defaults
//!
//! content_dir = "content"
//! themes_dir = "themes"
//! assets_dir = "assets"
//! output_dir = "public"
//!
//! [build]
//! drafts = false    # build draft content too
//! cache = true      # memoize metadata and compiled themes per build
//! minify = false    # minify every rendered page
//! ```
//!
//! Relative directories are resolved against the site root. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the site configuration file.
pub const CONFIG_FILE: &str = "boom.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `boom.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Markdown content tree.
    pub content_dir: PathBuf,
    /// Directory holding one sub-directory per theme.
    pub themes_dir: PathBuf,
    /// Static files copied to `<output>/assets`.
    pub assets_dir: PathBuf,
    /// Build output; emptied before every build.
    pub output_dir: PathBuf,
    pub build: BuildConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            themes_dir: PathBuf::from("themes"),
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("public"),
            build: BuildConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Build draft content as if it were published.
    pub drafts: bool,
    /// Memoize resolved metadata and compiled themes within one build.
    pub cache: bool,
    /// Minify rendered HTML before it is written.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            drafts: false,
            cache: true,
            minify: false,
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, dir) in [
            ("content_dir", &self.content_dir),
            ("themes_dir", &self.themes_dir),
            ("assets_dir", &self.assets_dir),
            ("output_dir", &self.output_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.output_dir == Path::new(".") {
            return Err(ConfigError::Validation(
                "output_dir must not be the site root".into(),
            ));
        }
        if self.output_dir == self.content_dir {
            return Err(ConfigError::Validation(
                "output_dir must differ from content_dir".into(),
            ));
        }
        Ok(())
    }

    /// Absolute content directory for a site at `root`.
    pub fn content_path(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }

    pub fn themes_path(&self, root: &Path) -> PathBuf {
        root.join(&self.themes_dir)
    }

    pub fn assets_path(&self, root: &Path) -> PathBuf {
        root.join(&self.assets_dir)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}

// -----------------------------------------------------------------------------
// Layering: stock defaults < boom.toml < command line
// -----------------------------------------------------------------------------

/// Stock defaults as a TOML table, the bottom layer of every site config.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Lay `overlay` over `base`.
///
/// Tables merge per key, recursively. Any other overlay value wins outright,
/// and base keys the overlay does not mention survive.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut lower), toml::Value::Table(upper)) => {
            for (key, value) in upper {
                let value = match lower.remove(&key) {
                    Some(below) => merge_toml(below, value),
                    None => value,
                };
                lower.insert(key, value);
            }
            toml::Value::Table(lower)
        }
        (_, scalar) => scalar,
    }
}

/// The site's own `boom.toml` as raw TOML, or `None` when the site has none.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Turn a (possibly overlaid) TOML value into a validated [`SiteConfig`].
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let value = overlay.into_iter().fold(base, merge_toml);
    let config = SiteConfig::deserialize(value)?;
    config.validate()?;
    Ok(config)
}

/// Config of the site rooted at `root`.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Returns a fully-commented stock `boom.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# boom configuration
# ==================
# Every setting is optional and may be deleted.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Directories are relative to the site root (the directory holding this file).

# Markdown content tree. Every directory may hold an _index.md with its own
# metadata, which files below it inherit.
content_dir = "content"

# One sub-directory per theme. Pages pick a theme with the `theme` front-matter
# key; without one the first theme by name is used. Without any theme the
# built-in theme renders the site.
themes_dir = "themes"

# Static files copied to <output_dir>/assets.
assets_dir = "assets"

# Build output. Emptied before every build.
output_dir = "public"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Build content marked `draft = true` as if it were published.
drafts = false

# Memoize resolved metadata and compiled themes during a build.
cache = true

# Minify rendered pages (whitespace, comments, optional tags).
minify = false
"##
}
