//! Built-in theme.
//!
//! Used when a site has no `themes/` directory. Pages are rendered with
//! [maud](https://maud.lambda.xyz/), so the layouts are type-checked Rust with
//! automatic escaping; only the already-rendered markdown bodies are inserted
//! with `PreEscaped`.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Home › Blog › Archive                │  breadcrumb from the path trail
//! ├──────────────────────────────────────┤
//! │ title, byline, body                  │
//! │ listing / tagged files               │
//! │ tags                                 │
//! │ ‹ newer        1 2 3        older ›  │  pagination or siblings
//! └──────────────────────────────────────┘
//! ```
//!
//! The stylesheet in `static/style.css` is embedded at compile time.

use crate::metadata::ResolvedMetadata;
use crate::types::{ContentNode, DirData, FileData, PageData, PageInfo, TagEntry, TagFilesData};
use crate::url;
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

/// Render any page with the built-in layouts.
pub fn render_page(data: &PageData) -> Markup {
    match data {
        PageData::Dir(dir) => render_directory(dir),
        PageData::File(file) => render_file(file),
        PageData::TagFiles(tagged) => render_tag_files(tagged),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Breadcrumb over the path trail; the last entry is the current page.
fn site_header(trail: &[ContentNode], current: Option<&str>) -> Markup {
    let linked = match current {
        Some(_) => trail,
        None => trail.split_last().map(|(_, rest)| rest).unwrap_or(trail),
    };
    let last = match current {
        Some(title) => Some(title.to_string()),
        None => trail.last().map(|node| node.title.clone()),
    };
    html! {
        header.site-header {
            nav.breadcrumb {
                @for node in linked {
                    a href=(node.url) { (node.title) }
                    " › "
                }
                @if let Some(title) = last {
                    span.current { (title) }
                }
            }
        }
    }
}

fn byline(meta: &ResolvedMetadata) -> Markup {
    let time = meta.effective_time();
    html! {
        @if meta.author.is_some() || time.is_some() {
            p.byline {
                @if let Some(author) = &meta.author {
                    span.author { (author) }
                }
                @if let Some(time) = time {
                    " "
                    (render_time(time))
                }
            }
        }
    }
}

fn render_time(time: DateTime<Utc>) -> Markup {
    html! {
        time datetime=(time.to_rfc3339()) { (time.format("%Y-%m-%d").to_string()) }
    }
}

fn render_listing(items: &[ContentNode]) -> Markup {
    html! {
        ul.listing {
            @for item in items {
                li class=[item.is_dir.then_some("dir")] {
                    a href=(item.url) { (item.title) }
                    @if item.is_dir {
                        span.count { (item.child_count.to_string()) }
                    }
                    @if let Some(time) = item.time {
                        (render_time(time))
                    }
                    @if let Some(description) = &item.description {
                        p.description { (description) }
                    }
                }
            }
        }
    }
}

fn render_tags(tags: &[TagEntry], with_counts: bool) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li {
                        a href=(tag.url) { (tag.name) }
                        @if with_counts {
                            span.count { (tag.count.to_string()) }
                        }
                    }
                }
            }
        }
    }
}

fn render_pagination(url: &str, page: &PageInfo) -> Markup {
    html! {
        @if page.max > 1 {
            nav.pagination {
                @if page.current > 1 {
                    a.prev href=(url::pagination_link(url, page.current - 1)) { "‹ Previous" }
                } @else {
                    span {}
                }
                span.pages {
                    @for n in 1..=page.max {
                        @if n == page.current {
                            span.current { (n.to_string()) }
                        } @else {
                            a href=(url::pagination_link(url, n)) { (n.to_string()) }
                        }
                        " "
                    }
                }
                @if page.current < page.max {
                    a.next href=(url::pagination_link(url, page.current + 1)) { "Next ›" }
                } @else {
                    span {}
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_directory(data: &DirData) -> Markup {
    let content = html! {
        (site_header(&data.trail, None))
        main.directory-page {
            h1 { (data.meta.title) }
            @if let Some(description) = &data.meta.description {
                p.description { (description) }
            }
            @if !data.content.is_empty() {
                article { (PreEscaped(&data.content)) }
            }
            (render_listing(&data.items))
            (render_tags(&data.tags, true))
            (render_pagination(&data.url, &data.page))
        }
    };
    base_document(&data.meta.title, Some("directory"), content)
}

fn render_file(data: &FileData) -> Markup {
    let content = html! {
        (site_header(&data.trail, None))
        main.file-page {
            article {
                h1 { (data.meta.title) }
                (byline(&data.meta))
                (PreEscaped(&data.content))
            }
            (render_tags(&data.tags, false))
            nav.siblings {
                @if let Some(prev) = &data.prev {
                    a.prev href=(prev.url) { "‹ " (prev.title) }
                } @else {
                    span {}
                }
                a.up href=(data.dir_url) { "Index" }
                @if let Some(next) = &data.next {
                    a.next href=(next.url) { (next.title) " ›" }
                } @else {
                    span {}
                }
            }
        }
    };
    base_document(&data.meta.title, Some("file"), content)
}

fn render_tag_files(data: &TagFilesData) -> Markup {
    let heading = format!("#{}", data.tag);
    let content = html! {
        (site_header(&data.trail, Some(heading.as_str())))
        main.tag-page {
            h1 { (heading) }
            (render_listing(&data.files))
            (render_pagination(&data.url, &data.page))
        }
    };
    let title = format!("{heading} · {}", data.meta.title);
    base_document(&title, Some("tag-files"), content)
}

// ============================================================================
// Tests
// ============================================================================
