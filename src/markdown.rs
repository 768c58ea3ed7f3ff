//! Markdown body rendering.
//!
//! Bodies are rendered with `pulldown-cmark` using the GitHub-flavoured set of
//! extensions (tables, strikethrough, task lists) plus footnotes, definition
//! lists and `{#id .class}` heading attributes. Two adjustments are applied to
//! the event stream before HTML is produced:
//!
//! - soft line breaks become hard breaks, so a newline in the source is a
//!   newline on the page;
//! - headings without an explicit id get one derived from their text
//!   (`## Getting Started` → `id="getting-started"`), suffixed `-1`, `-2`, …
//!   when the same slug repeats in a document.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use std::collections::HashSet;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render a markdown body to an HTML fragment.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let events = with_heading_ids(parser);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn with_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut open_heading: Option<usize> = None;
    let mut heading_text = String::new();

    for event in events {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                open_heading = Some(out.len());
                heading_text.clear();
            }
            Event::Text(text) | Event::Code(text) if open_heading.is_some() => {
                heading_text.push_str(text);
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(start) = open_heading.take() {
                    let slug = unique_slug(&heading_text, &mut seen);
                    if let Event::Start(Tag::Heading { id, .. }) = &mut out[start] {
                        *id = Some(slug.into());
                    }
                }
            }
            _ => {}
        }
        out.push(event);
    }
    out
}

/// Lowercase alphanumerics, everything else collapsed into single dashes.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

/// Slug of `text` not yet in `seen`, suffixed `-1`, `-2`, ... when taken.
fn unique_slug(text: &str, seen: &mut HashSet<String>) -> String {
    let base = slugify(text);
    let mut slug = base.clone();
    let mut suffix = 0;
    while seen.contains(&slug) {
        suffix += 1;
        slug = format!("{base}-{suffix}");
    }
    seen.insert(slug.clone());
    slug
}
