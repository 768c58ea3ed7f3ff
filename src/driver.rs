//! Whole-site traversal.
//!
//! The driver starts at the content root and follows every link a page
//! reports, breadth first, building each URL exactly once:
//!
//! ```text
//! queue: [""]
//!   ""            → built, children [about, blog, tag-rust]
//!   about         → built
//!   blog          → built, children [blog/hello, blog/tag-rust, blog/1, blog/2]
//!   tag-rust      → built
//!   blog/hello    → skipped (draft)
//!   …
//! ```
//!
//! A URL is marked processed before it is built, so pages that link back to
//! each other (numbered pages always do) cannot loop. Any build error aborts
//! the run; pages already handed to the sink stay written.

use crate::builder::{BuildError, BuildOutcome, Builder, SkipReason};
use crate::content::ContentTree;
use crate::metadata::CacheStats;
use crate::render::TemplateRenderer;
use crate::url;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io;

/// Destination of built pages.
pub trait PageSink {
    /// Store the page built for clean URL `url`.
    fn write_page(&mut self, url: &str, html: &[u8]) -> io::Result<()>;
}

/// Keeps built pages in memory, keyed by clean URL.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pages: BTreeMap<String, Vec<u8>>,
    /// Number of writes, to catch pages built twice.
    pub writes: usize,
}

impl PageSink for MemorySink {
    fn write_page(&mut self, url: &str, html: &[u8]) -> io::Result<()> {
        self.writes += 1;
        self.pages.insert(url.to_string(), html.to_vec());
        Ok(())
    }
}

/// What a traversal did.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Built URLs in build order.
    pub built: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub cache: CacheStats,
}

pub struct BuildDriver<T, R, S> {
    builder: Builder<T, R>,
    sink: S,
    processed: HashSet<String>,
}

impl<T: ContentTree, R: TemplateRenderer, S: PageSink> BuildDriver<T, R, S> {
    pub fn new(builder: Builder<T, R>, sink: S) -> Self {
        Self {
            builder,
            sink,
            processed: HashSet::new(),
        }
    }

    /// Build `entry` and everything reachable from it.
    pub fn run(&mut self, entry: &str) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        let mut queue = VecDeque::from([url::normalize(entry)]);

        while let Some(next) = queue.pop_front() {
            let current = url::normalize(&next);
            if !self.processed.insert(current.clone()) {
                continue;
            }

            match self.builder.build(&current)? {
                BuildOutcome::Built { html, children } => {
                    self.sink.write_page(&current, &html)?;
                    tracing::debug!(url = %url::href(&current), children = children.len(), "built");
                    queue.extend(
                        children
                            .into_iter()
                            .filter(|child| !self.processed.contains(child)),
                    );
                    report.built.push(current);
                }
                BuildOutcome::Skipped(reason) => {
                    tracing::debug!(url = %url::href(&current), ?reason, "skipped");
                    report.skipped.push((current, reason));
                }
            }
        }

        report.cache = self.builder.resolver().cache_stats();
        Ok(report)
    }

    /// Clean URLs handled so far, built or skipped.
    pub fn processed(&self) -> &HashSet<String> {
        &self.processed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
