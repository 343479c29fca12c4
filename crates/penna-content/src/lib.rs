//! Markdown post parsing for the penna blog generator.
//!
//! This crate reads a directory of markdown posts with YAML frontmatter and
//! turns them into an ordered, tag-indexed content store. Posts follow the
//! `YYYY-MM-DD-slug.md` filename convention; frontmatter can override the
//! date and slug derived from the filename.

pub mod frontmatter;
pub mod parser;
pub mod post;
pub mod store;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use parser::{extract_excerpt, extract_toc, markdown_options, slugify, TocEntry};
pub use post::{Post, PostError};
pub use store::{ContentStore, StoreError, TagGroup};
