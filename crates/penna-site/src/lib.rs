//! Static site generator for the penna blog.
//!
//! Builds a deployable static site from a directory of markdown posts:
//! post pages, a paginated chronological index, tag pages, an RSS feed,
//! a sitemap, and the default theme assets.

pub mod assets;
pub mod builder;
pub mod feed;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
