//! Template rendering with site themes.
//!
//! ## Theme Layout
//!
//! ```text
//! themes/
//! └── paper/
//!     ├── base.html          # shared layout, extended by the pages
//!     ├── directory.html     # directory pages
//!     ├── file.html          # single content files
//!     ├── tagfiles.html      # tag listings
//!     └── style.css          # copied to output/themes/paper/style.css
//! ```
//!
//! A page's theme comes from its resolved `theme` field; when unset, the first
//! theme directory in name order is used. Every `*.html` file of a theme is
//! loaded into one [`tera`] instance so templates can `extends` and `include`
//! each other, and the page template is `<template>.html`.
//!
//! Templates receive the page's [`PageData`] fields at the top level (`url`,
//! `meta`, `content`, `trail`, …) and can call
//! `pagination_link(path=url, page=n)` to link other pages of a listing.
//! Theme templates are autoescaped, so the rendered markdown in `content` and
//! the links returned by `pagination_link` are emitted with `| safe`.
//!
//! When the site has no theme directory at all, pages are rendered with the
//! built-in theme in [`crate::theme`].

use crate::theme;
use crate::types::PageData;
use crate::url;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tera::{Context, Tera, Value};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("theme `{0}` not found")]
    ThemeNotFound(String),
    #[error("theme name `{0}` must be a single directory name")]
    InvalidThemeName(String),
    #[error("template `{template}.html` not found in theme `{theme}`")]
    TemplateNotFound { theme: String, template: String },
    #[error("failed to load theme `{theme}`: {message}")]
    Load { theme: String, message: String },
    #[error("failed to render `{template}`: {message}")]
    Template { template: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Turns page data into HTML.
pub trait TemplateRenderer {
    fn render(
        &mut self,
        data: &PageData,
        theme: Option<&str>,
        template: &str,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Renders pages with the tera themes found under a themes directory.
pub struct ThemeRenderer {
    themes_dir: PathBuf,
    cache_enabled: bool,
    loaded: HashMap<String, Tera>,
    first_theme: Option<Option<String>>,
}

impl ThemeRenderer {
    pub fn new(themes_dir: impl Into<PathBuf>, cache_enabled: bool) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            cache_enabled,
            loaded: HashMap::new(),
            first_theme: None,
        }
    }

    /// Theme to use for a page, or `None` for the built-in theme.
    fn pick_theme(&mut self, requested: Option<&str>) -> Result<Option<String>, RenderError> {
        if let Some(name) = requested {
            let mut components = Path::new(name).components();
            if !matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            ) {
                return Err(RenderError::InvalidThemeName(name.to_string()));
            }
            if !self.themes_dir.join(name).is_dir() {
                return Err(RenderError::ThemeNotFound(name.to_string()));
            }
            return Ok(Some(name.to_string()));
        }
        if self.first_theme.is_none() {
            let found = first_theme(&self.themes_dir)?;
            match &found {
                Some(name) => tracing::debug!(theme = %name, "using first theme"),
                None => tracing::debug!("no themes found, using built-in theme"),
            }
            self.first_theme = Some(found);
        }
        Ok(self.first_theme.clone().flatten())
    }
}

impl TemplateRenderer for ThemeRenderer {
    fn render(
        &mut self,
        data: &PageData,
        theme: Option<&str>,
        template: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let Some(theme) = self.pick_theme(theme)? else {
            return Ok(theme::render_page(data).into_string().into_bytes());
        };

        let context = Context::from_serialize(data).map_err(|e| RenderError::Template {
            template: template.to_string(),
            message: format_tera_error(&e),
        })?;

        let theme_dir = self.themes_dir.join(&theme);
        let html = if self.cache_enabled {
            let tera = match self.loaded.entry(theme.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(load_theme(&theme_dir, &theme)?),
            };
            render_with(tera, &theme, template, &context)?
        } else {
            let tera = load_theme(&theme_dir, &theme)?;
            render_with(&tera, &theme, template, &context)?
        };
        Ok(html.into_bytes())
    }
}

fn first_theme(themes_dir: &Path) -> Result<Option<String>, RenderError> {
    if !themes_dir.is_dir() {
        return Ok(None);
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(themes_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() && !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.into_iter().next())
}

fn load_theme(dir: &Path, theme: &str) -> Result<Tera, RenderError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| RenderError::Load {
            theme: theme.to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((path.to_path_buf(), Some(name)));
    }

    let mut tera = Tera::default();
    tera.register_function("pagination_link", pagination_link);
    tera.add_template_files(files)
        .map_err(|e| RenderError::Load {
            theme: theme.to_string(),
            message: format_tera_error(&e),
        })?;
    tracing::debug!(theme, templates = tera.get_template_names().count(), "loaded theme");
    Ok(tera)
}

fn render_with(
    tera: &Tera,
    theme: &str,
    template: &str,
    context: &Context,
) -> Result<String, RenderError> {
    let name = format!("{template}.html");
    if !tera.get_template_names().any(|n| n == name) {
        return Err(RenderError::TemplateNotFound {
            theme: theme.to_string(),
            template: template.to_string(),
        });
    }
    tera.render(&name, context).map_err(|e| RenderError::Template {
        template: name,
        message: format_tera_error(&e),
    })
}

/// `pagination_link(path="/blog/2", page=3)` → `"/blog/3"`.
fn pagination_link(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = args
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("pagination_link requires a string `path`"))?;
    let page = args
        .get("page")
        .and_then(Value::as_u64)
        .and_then(|page| usize::try_from(page).ok())
        .ok_or_else(|| tera::Error::msg("pagination_link requires a positive integer `page`"))?;
    Ok(Value::String(url::pagination_link(path, page)))
}

/// Flatten a tera error and its source chain into one line.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error as _;

    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages.dedup();
    messages.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::resolved_meta;
    use crate::types::{DirData, PageInfo};
    use tempfile::TempDir;

    fn dir_page() -> PageData {
        PageData::Dir(DirData {
            url: "/blog/2".to_string(),
            meta: resolved_meta("Blog <3>"),
            content: "<p>Hello</p>".to_string(),
            trail: vec![],
            items: vec![],
            tags: vec![],
            page: PageInfo { current: 2, max: 3, page_size: 10 },
        })
    }

    fn write_theme(root: &Path, theme: &str, files: &[(&str, &str)]) {
        let dir = root.join(theme);
        fs::create_dir_all(&dir).unwrap();
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
    }

    #[test]
    fn renders_named_template_with_inheritance() {
        let tmp = TempDir::new().unwrap();
        write_theme(
            tmp.path(),
            "paper",
            &[
                ("base.html", "<title>{{ meta.title }}</title>{% block main %}{% endblock %}"),
                (
                    "directory.html",
                    "{% extends \"base.html\" %}{% block main %}{{ content | safe }} {{ page.current }}/{{ page.max }}{% endblock %}",
                ),
            ],
        );
        let mut renderer = ThemeRenderer::new(tmp.path(), true);
        let html = renderer.render(&dir_page(), Some("paper"), "directory").unwrap();
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("<title>Blog &lt;3&gt;</title>"));
        assert!(html.contains("<p>Hello</p> 2/3"));
    }

    #[test]
    fn pagination_link_function_available() {
        let tmp = TempDir::new().unwrap();
        write_theme(
            tmp.path(),
            "paper",
            &[("directory.html", "{{ pagination_link(path=url, page=3) | safe }}")],
        );
        let mut renderer = ThemeRenderer::new(tmp.path(), false);
        let html = renderer.render(&dir_page(), None, "directory").unwrap();
        assert_eq!(String::from_utf8(html).unwrap(), "/blog/3");
    }

    #[test]
    fn unset_theme_picks_first_by_name() {
        let tmp = TempDir::new().unwrap();
        write_theme(tmp.path(), "zinc", &[("directory.html", "zinc")]);
        write_theme(tmp.path(), "amber", &[("directory.html", "amber")]);
        let mut renderer = ThemeRenderer::new(tmp.path(), true);
        let html = renderer.render(&dir_page(), None, "directory").unwrap();
        assert_eq!(html, b"amber");
    }

    #[test]
    fn missing_template_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_theme(tmp.path(), "paper", &[("file.html", "")]);
        let mut renderer = ThemeRenderer::new(tmp.path(), true);
        let err = renderer.render(&dir_page(), None, "directory").unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { .. }));
    }

    #[test]
    fn missing_theme_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_theme(tmp.path(), "paper", &[("directory.html", "")]);
        let mut renderer = ThemeRenderer::new(tmp.path(), true);
        let err = renderer.render(&dir_page(), Some("nope"), "directory").unwrap_err();
        assert!(matches!(err, RenderError::ThemeNotFound(name) if name == "nope"));
    }

    #[test]
    fn theme_names_cannot_leave_themes_dir() {
        let tmp = TempDir::new().unwrap();
        let themes = tmp.path().join("themes");
        write_theme(&themes, "paper", &[("directory.html", "paper")]);
        write_theme(tmp.path(), "elsewhere", &[("directory.html", "outside")]);

        let mut renderer = ThemeRenderer::new(&themes, true);
        for name in ["../elsewhere", "/tmp", "paper/..", ".", ""] {
            let err = renderer.render(&dir_page(), Some(name), "directory").unwrap_err();
            assert!(matches!(err, RenderError::InvalidThemeName(_)), "{name}: {err}");
        }
        assert!(renderer.render(&dir_page(), Some("paper"), "directory").is_ok());
    }

    #[test]
    fn template_syntax_error_reported() {
        let tmp = TempDir::new().unwrap();
        write_theme(tmp.path(), "paper", &[("directory.html", "{% if %}")]);
        let mut renderer = ThemeRenderer::new(tmp.path(), true);
        let err = renderer.render(&dir_page(), None, "directory").unwrap_err();
        assert!(matches!(err, RenderError::Load { .. }));
    }

    #[test]
    fn no_themes_falls_back_to_builtin() {
        let tmp = TempDir::new().unwrap();
        let mut renderer = ThemeRenderer::new(tmp.path().join("themes"), true);
        let html = renderer.render(&dir_page(), None, "directory").unwrap();
        let html = String::from_utf8(html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Hello</p>"));
    }
}
