//! Per-URL page building.
//!
//! [`Builder::build`] turns one requested URL into rendered HTML plus the URLs
//! that page links to, which the driver then builds in turn:
//!
//! | Kind        | Template data                               | Children                                 |
//! |-------------|---------------------------------------------|------------------------------------------|
//! | Directory   | index body, listing page, scope tags, trail | listed items, tag listings, every page   |
//! | File        | body, own tags, siblings, trail             | none                                     |
//! | Tag listing | tagged files page, trail                    | every page                               |
//!
//! "Every page" is only emitted when the listing spans more than one page.
//! A draft file is skipped unless drafts are enabled; a draft `_index.md`
//! still produces its directory listing, but with the index body hidden.
//! With [`BuildOptions::minify`] the rendered HTML goes through `minify-html`.

use crate::classify::{self, ClassifiedPath, ContentKind, NotPartOfContent};
use crate::content::{ContentTree, INDEX_FILE, url_to_path};
use crate::listing;
use crate::metadata::{MetadataError, MetadataResolver, Resolved, TemplateKind};
use crate::navigation;
use crate::paginate::{PageWindow, page_of_index, paginate};
use crate::render::{RenderError, TemplateRenderer};
use crate::tags;
use crate::types::{ContentNode, DirData, FileData, PageData, PageInfo, TagFilesData};
use crate::url;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    NotPartOfContent(#[from] NotPartOfContent),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("failed to render {url}: {source}")]
    Render { url: String, source: RenderError },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Why a URL produced no page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Draft,
}

#[derive(Debug)]
pub enum BuildOutcome {
    Built { html: Vec<u8>, children: Vec<String> },
    Skipped(SkipReason),
}

/// Everything needed to render a page, before rendering.
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub data: PageData,
    pub theme: Option<String>,
    pub template: String,
    /// Clean URLs this page leads to.
    pub children: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Prepared {
    Page(Box<PagePlan>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Treat drafts like any other content.
    pub include_drafts: bool,
    /// Minify rendered pages.
    pub minify: bool,
}

pub struct Builder<T, R> {
    resolver: MetadataResolver<T>,
    renderer: R,
    options: BuildOptions,
}

impl<T: ContentTree, R: TemplateRenderer> Builder<T, R> {
    pub fn new(resolver: MetadataResolver<T>, renderer: R, options: BuildOptions) -> Self {
        Self {
            resolver,
            renderer,
            options,
        }
    }

    pub fn resolver(&self) -> &MetadataResolver<T> {
        &self.resolver
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Build the page at `url`.
    pub fn build(&mut self, url: &str) -> Result<BuildOutcome, BuildError> {
        let plan = match self.prepare(url)? {
            Prepared::Page(plan) => plan,
            Prepared::Skipped(reason) => return Ok(BuildOutcome::Skipped(reason)),
        };
        let mut html = self
            .renderer
            .render(&plan.data, plan.theme.as_deref(), &plan.template)
            .map_err(|source| BuildError::Render {
                url: plan.data.url().to_string(),
                source,
            })?;
        if self.options.minify {
            html = minify_html::minify(&html, &minify_html::Cfg::new());
        }
        Ok(BuildOutcome::Built {
            html,
            children: plan.children,
        })
    }

    /// Classify `url` and assemble its template data without rendering.
    pub fn prepare(&mut self, url: &str) -> Result<Prepared, BuildError> {
        let classified = classify::classify(self.resolver.tree(), url)?;
        tracing::debug!(url = %classified.url, kind = ?classified.kind, "building");

        let plan = match classified.kind {
            ContentKind::Directory => self.plan_directory(&classified)?,
            ContentKind::TagListing => self.plan_tag_listing(&classified)?,
            ContentKind::File => match self.plan_file(&classified)? {
                Some(plan) => plan,
                None => {
                    tracing::debug!(url = %classified.url, "skipping draft");
                    return Ok(Prepared::Skipped(SkipReason::Draft));
                }
            },
        };
        Ok(Prepared::Page(Box::new(plan)))
    }

    fn include_drafts(&self) -> bool {
        self.options.include_drafts
    }

    fn resolve_dir(&mut self, dir_url: &str) -> Result<Resolved, MetadataError> {
        let index = url_to_path(self.resolver.tree().root(), dir_url).join(INDEX_FILE);
        self.resolver.resolve(&index)
    }

    fn plan_directory(&mut self, classified: &ClassifiedPath) -> Result<PagePlan, BuildError> {
        let dir_url = classified.clean_path.as_str();
        let include = self.include_drafts();
        let resolved = self.resolve_dir(dir_url)?;
        let meta = &resolved.meta;

        let content = if meta.draft && !include {
            String::new()
        } else {
            resolved.body.to_string()
        };

        let listing = listing::aggregate(&mut self.resolver, dir_url, include)?;
        let tags = tags::index_tags(&mut self.resolver, dir_url, include)?;
        let window = paginate(listing.len(), classified.page, meta.page_size());
        let items = window.slice(&listing).to_vec();
        let trail = navigation::ancestor_trail(&mut self.resolver, dir_url)?;

        let mut children: Vec<String> = items.iter().map(|node| url::normalize(&node.url)).collect();
        children.extend(tags.iter().map(|tag| url::normalize(&tag.url)));
        children.extend(page_urls(dir_url, &window));

        Ok(PagePlan {
            theme: meta.theme.clone(),
            template: meta.template(TemplateKind::Directory).to_string(),
            data: PageData::Dir(DirData {
                url: url::href(&classified.url),
                meta: (**meta).clone(),
                content,
                trail,
                items,
                tags,
                page: page_info(&window, meta.page_size()),
            }),
            children,
        })
    }

    fn plan_file(&mut self, classified: &ClassifiedPath) -> Result<Option<PagePlan>, BuildError> {
        let include = self.include_drafts();
        let path = classified.fs_path(self.resolver.tree().root());
        let resolved = self.resolver.resolve(&path)?;
        let meta = &resolved.meta;
        if meta.draft && !include {
            return Ok(None);
        }

        let file_url = url::href(&classified.clean_path);
        let dir_url = url::parent(&classified.clean_path);

        let mut trail = navigation::ancestor_trail(&mut self.resolver, dir_url)?;
        trail.push(ContentNode {
            url: file_url.clone(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            is_dir: false,
            time: meta.effective_time(),
            child_count: 0,
        });

        let tags = tags::index_tags(&mut self.resolver, dir_url, include)?
            .into_iter()
            .filter(|tag| tags::has_tag(&meta.tags, &tag.name))
            .collect();

        let listing = listing::aggregate(&mut self.resolver, dir_url, include)?;
        let siblings = navigation::siblings(&listing, &file_url);
        let page_size = self.resolve_dir(dir_url)?.meta.page_size();
        let dir_page = siblings.index.map(|index| page_of_index(index, page_size));
        let window = paginate(listing.len(), dir_page, page_size);
        let dir_page_url = if window.current > 1 {
            url::href(&url::page_url(dir_url, window.current))
        } else {
            url::href(dir_url)
        };

        Ok(Some(PagePlan {
            theme: meta.theme.clone(),
            template: meta.template(TemplateKind::File).to_string(),
            data: PageData::File(FileData {
                url: file_url,
                meta: (**meta).clone(),
                content: resolved.body.to_string(),
                trail,
                tags,
                prev: siblings.prev,
                next: siblings.next,
                dir_url: dir_page_url,
                items: window.slice(&listing).to_vec(),
                page: page_info(&window, page_size),
            }),
            children: Vec::new(),
        }))
    }

    fn plan_tag_listing(&mut self, classified: &ClassifiedPath) -> Result<PagePlan, BuildError> {
        let scope = classified.clean_path.as_str();
        let tag = classified.tag.clone().unwrap_or_default();
        let include = self.include_drafts();
        let resolved = self.resolve_dir(scope)?;
        let meta = &resolved.meta;

        let files = tags::tagged_files(&mut self.resolver, scope, &tag, include)?;
        let window = paginate(files.len(), classified.page, meta.page_size());
        let trail = navigation::ancestor_trail(&mut self.resolver, scope)?;
        let children = page_urls(&url::tag_url(scope, &tag), &window);
        // Shown as spelled in front matter rather than as its slug.
        let name = tags::index_tags(&mut self.resolver, scope, include)?
            .into_iter()
            .find(|entry| url::tag_slug(&entry.name) == url::tag_slug(&tag))
            .map_or(tag, |entry| entry.name);

        Ok(PagePlan {
            theme: meta.theme.clone(),
            template: meta.template(TemplateKind::TagFiles).to_string(),
            data: PageData::TagFiles(TagFilesData {
                url: url::href(&classified.url),
                tag: name,
                meta: (**meta).clone(),
                trail,
                files: window.slice(&files).to_vec(),
                page: page_info(&window, meta.page_size()),
            }),
            children,
        })
    }
}

fn page_urls(base: &str, window: &PageWindow) -> Vec<String> {
    if !window.is_paginated() {
        return Vec::new();
    }
    (1..=window.max).map(|page| url::page_url(base, page)).collect()
}

fn page_info(window: &PageWindow, page_size: i64) -> PageInfo {
    PageInfo {
        current: window.current,
        max: window.max,
        page_size,
    }
}
