//! # boom
//!
//! A static site generator for markdown content trees. The content directory
//! is the data source: every markdown file becomes a page, every directory a
//! paginated listing of its children, and every tag a listing of the files
//! that use it.
//!
//! # Architecture: URL-Driven Build
//!
//! There is no up-front scan. The build starts at the root URL and follows the
//! links each page reports, so exactly the reachable pages are produced:
//!
//! ```text
//! url ──▶ classify ──▶ resolve metadata ──▶ plan page ──▶ render ──▶ sink
//!  ▲                                            │
//!  └───────────────── children ◀────────────────┘
//! ```
//!
//! Each URL is one of three kinds:
//!
//! ```text
//! /blog            directory listing (page 1)
//! /blog/2          directory listing, page 2
//! /blog/tag-rust   files tagged "rust" anywhere below /blog
//! /blog/hello      single file (content/blog/hello.md)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`url`] | Clean URL helpers: joining, tag and page URLs, rooted hrefs |
//! | [`content`] | Content tree access behind the [`content::ContentTree`] trait |
//! | [`front_matter`] | `+++`-delimited TOML front matter: split, parse, compose |
//! | [`markdown`] | Markdown → HTML with `pulldown-cmark` |
//! | [`metadata`] | Inheritance of theme, templates and pagination from `_index.md` files, with a per-build cache |
//! | [`classify`] | URL → directory, file or tag listing, plus page number |
//! | [`listing`] | Directory children as listing entries, newest first |
//! | [`tags`] | Tag usage counts and tagged files of a directory subtree |
//! | [`paginate`] | Page window arithmetic |
//! | [`navigation`] | Previous/next siblings and the ancestor trail |
//! | [`types`] | Template data handed to themes |
//! | [`builder`] | Assembles and renders the page for one URL |
//! | [`driver`] | Breadth-first traversal building every reachable URL once |
//! | [`render`] | Tera themes loaded from the themes directory |
//! | [`theme`] | Built-in Maud theme used when no theme is installed |
//! | [`publish`] | Output directory: page files, cleaning, asset copies |
//! | [`scaffold`] | Creating and updating content files for `boom new` |
//! | [`config`] | `boom.toml` loading, validation and merging |
//! | [`site`] | A site on disk and the build, check, inspect and new pipelines |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Inherited Metadata
//!
//! `theme`, the three template names and `pagination` flow down from the
//! nearest `_index.md` that sets them:
//!
//! ```text
//! content/_index.md          pagination = 10, theme = "paper"
//! content/blog/_index.md     pagination = 5
//! content/blog/hello.md      → theme "paper", pagination 5
//! ```
//!
//! Title, description, author, times, tags and draft are never inherited.
//!
//! ## Runtime Themes, Built-In Fallback
//!
//! Themes are tera templates so they can be edited without recompiling. A site
//! without a themes directory still builds: the built-in theme is written with
//! Maud and renders every page kind.
//!
//! ## Drafts
//!
//! Draft files are left out of listings and tag counts, and a draft URL
//! requested directly is skipped rather than failing. `--drafts` (or
//! `[build] drafts = true`) publishes them like any other file.

pub mod builder;
pub mod classify;
pub mod config;
pub mod content;
pub mod driver;
pub mod front_matter;
pub mod listing;
pub mod markdown;
pub mod metadata;
pub mod navigation;
pub mod output;
pub mod paginate;
pub mod publish;
pub mod render;
pub mod scaffold;
pub mod site;
pub mod tags;
pub mod theme;
pub mod types;
pub mod url;

#[cfg(test)]
pub(crate) mod test_helpers;
