//! URL path helpers.
//!
//! Inside the engine every URL is kept in its *clean* form: no leading or
//! trailing slash, segments joined by `/`, and the content root spelled as the
//! empty string. Template data and child links use the rooted form produced by
//! [`href`] (`/blog/post`), and [`normalize`] turns either form back into a
//! clean one.
//!
//! ```text
//! /blog/rust/          → blog/rust
//! /blog/tag-rust/2     → blog/tag-rust/2
//! /blog/#              → blog
//! /                    → (root)
//! ```

/// Prefix of the path segment that marks a tag listing: `blog/tag-rust`.
pub const TAG_MARKER: &str = "tag-";

/// Clean a requested URL path.
///
/// Leading and trailing slashes and a trailing `#` are trimmed repeatedly until
/// the path is stable, and empty segments (`a//b`) are dropped.
pub fn normalize(url: &str) -> String {
    let mut current = url;
    loop {
        let trimmed = current.trim_matches('/');
        let trimmed = trimmed.strip_suffix('#').unwrap_or(trimmed);
        if trimmed.len() == current.len() {
            break;
        }
        current = trimmed;
    }

    current
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Append a segment to a clean URL.
pub fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}/{segment}")
    }
}

/// Parent of a clean URL; the parent of a top-level entry is the root (`""`).
pub fn parent(url: &str) -> &str {
    url.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Final segment of a clean URL.
pub fn last_segment(url: &str) -> &str {
    url.rsplit_once('/').map(|(_, last)| last).unwrap_or(url)
}

/// Rooted form used in rendered pages: `blog/post` → `/blog/post`.
pub fn href(url: &str) -> String {
    format!("/{url}")
}

/// Clean URL of the listing for `tag` inside `scope`.
pub fn tag_url(scope: &str, tag: &str) -> String {
    join(scope, &format!("{TAG_MARKER}{}", tag_slug(tag)))
}

/// URL segment of a tag name.
///
/// Letters and digits are kept (lowercased), `#` and `+` are spelled out, and
/// every other run of characters becomes a single `-`:
///
/// ```text
/// Rust      → rust
/// ci/cd     → ci-cd
/// C#        → c-sharp
/// c++       → c-plus-plus
/// ```
///
/// Tag names that differ only in case or punctuation share one listing.
pub fn tag_slug(tag: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    for c in tag.chars() {
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            continue;
        }
        if !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
        match c {
            '#' => words.push("sharp".to_string()),
            '+' => words.push("plus".to_string()),
            _ => {}
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    words.join("-")
}

/// Clean URL of page `page` of the listing at `base`.
pub fn page_url(base: &str, page: usize) -> String {
    join(base, &page.to_string())
}

/// Link to another page of the listing currently shown at `current`.
///
/// A trailing page number on `current` is replaced rather than extended, so
/// links from `/blog/2` to page 3 point at `/blog/3`.
pub fn pagination_link(current: &str, page: usize) -> String {
    let clean = normalize(current);
    let last = last_segment(&clean);
    let base = if is_page_number(last) {
        parent(&clean)
    } else {
        clean.as_str()
    };
    href(&page_url(base, page))
}

/// Whether a segment is a page number: one or more ASCII digits.
pub fn is_page_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
