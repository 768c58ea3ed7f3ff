//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//!     / → index.html
//!     /blog → blog/index.html
//!     /blog/hello → blog/hello/index.html
//!
//! Skipped
//!     /wip (draft)
//!
//! Built 3 pages, skipped 1, copied 2 assets and 1 theme file
//! Cache: 41 hits, 9 misses
//! ```
//!
//! ## Check
//!
//! Same page list without the output paths, followed by
//! `Content is valid: 3 pages`.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::builder::SkipReason;
use crate::driver::BuildReport;
use crate::front_matter::ContentRecord;
use crate::site::{SiteReport, skip_label};
use crate::url;
use std::path::Path;

const INDENT: &str = "    ";

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Output path of a page, relative to the output directory.
fn page_file(clean_url: &str) -> String {
    if clean_url.is_empty() {
        "index.html".to_string()
    } else {
        format!("{clean_url}/index.html")
    }
}

fn skipped_lines(skipped: &[(String, SkipReason)]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    lines.extend(
        skipped
            .iter()
            .map(|(page, reason)| format!("{INDENT}{} ({})", url::href(page), skip_label(*reason))),
    );
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_report(report: &SiteReport) -> Vec<String> {
    let pages = &report.pages;
    let mut lines = vec!["Pages".to_string()];
    lines.extend(
        pages
            .built
            .iter()
            .map(|page| format!("{INDENT}{} → {}", url::href(page), page_file(page))),
    );
    lines.extend(skipped_lines(&pages.skipped));

    lines.push(String::new());
    lines.push(format!(
        "Built {}, skipped {}, copied {} and {}",
        plural(pages.built.len(), "page"),
        pages.skipped.len(),
        plural(report.assets, "asset"),
        plural(report.theme_files, "theme file"),
    ));
    lines.push(format!("Cache: {}", pages.cache));
    lines
}

pub fn print_build_report(report: &SiteReport) {
    for line in format_build_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    lines.extend(
        report
            .built
            .iter()
            .map(|page| format!("{INDENT}{}", url::href(page))),
    );
    lines.extend(skipped_lines(&report.skipped));
    lines.push(String::new());
    lines.push(format!(
        "Content is valid: {}",
        plural(report.built.len(), "page")
    ));
    lines
}

pub fn print_check_report(report: &BuildReport) {
    for line in format_check_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// New
// ============================================================================

pub fn format_new_content(path: &Path, record: &ContentRecord) -> Vec<String> {
    let mut lines = vec![format!("Wrote {}", path.display())];
    if let Some(title) = &record.title {
        lines.push(format!("{INDENT}Title: {title}"));
    }
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        lines.push(format!("{INDENT}Tags: {}", tags.join(", ")));
    }
    if let Some(created) = record.create_time {
        lines.push(format!("{INDENT}Created: {}", created.to_rfc3339()));
    }
    if let Some(updated) = record.update_time {
        lines.push(format!("{INDENT}Updated: {}", updated.to_rfc3339()));
    }
    if record.draft {
        lines.push(format!("{INDENT}Draft"));
    }
    lines
}

pub fn print_new_content(path: &Path, record: &ContentRecord) {
    for line in format_new_content(path, record) {
        println!("{line}");
    }
}
