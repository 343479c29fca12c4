//! Post parsing and identity.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::frontmatter::{extract_frontmatter, FrontmatterError};
use crate::parser::{extract_excerpt, extract_toc, slugify, TocEntry};

/// A parsed blog post.
#[derive(Debug, Clone)]
pub struct Post {
    /// URL slug, derived from the filename unless overridden in frontmatter
    pub slug: String,

    /// Post title from frontmatter
    pub title: String,

    /// Publication date; filename date unless overridden in frontmatter
    pub date: NaiveDate,

    /// Tags the post belongs to
    pub tags: Vec<String>,

    /// Short description for feeds and meta tags
    pub description: Option<String>,

    /// Whether the post is a draft
    pub draft: bool,

    /// Markdown body with frontmatter stripped
    pub body: String,

    /// Plain-text excerpt (first paragraph of prose)
    pub excerpt: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Source file path
    pub source_path: PathBuf,
}

/// Errors that can occur when parsing a post.
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("{path}: {source}")]
    Frontmatter {
        path: String,
        #[source]
        source: FrontmatterError,
    },

    #[error("{path}: post has no frontmatter block")]
    MissingFrontmatter { path: String },

    #[error("{path}: no date in filename (expected YYYY-MM-DD-slug.md) or frontmatter")]
    MissingDate { path: String },
}

impl Post {
    /// Parse a post from its source path and content.
    ///
    /// Identity comes from the filename: `2024-03-01-circuit-breakers.md`
    /// yields the date `2024-03-01` and the slug `circuit-breakers`.
    /// Frontmatter `date` and `slug` take precedence when present.
    pub fn parse(path: &Path, source: &str) -> Result<Self, PostError> {
        let display_path = path.display().to_string();

        let (frontmatter, content) =
            extract_frontmatter(source).map_err(|e| PostError::Frontmatter {
                path: display_path.clone(),
                source: e,
            })?;

        let Some(fm) = frontmatter else {
            return Err(PostError::MissingFrontmatter { path: display_path });
        };

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let filename_parts = parse_dated_filename(stem);

        let date = fm
            .date
            .or_else(|| filename_parts.as_ref().map(|(date, _)| *date))
            .ok_or(PostError::MissingDate { path: display_path })?;

        let slug = fm
            .slug
            .map(|s| slugify(&s))
            .or_else(|| filename_parts.map(|(_, slug)| slug))
            .unwrap_or_else(|| slugify(stem));

        Ok(Self {
            slug,
            title: fm.title,
            date,
            tags: fm.tags,
            description: fm.description,
            draft: fm.draft,
            excerpt: extract_excerpt(content),
            toc: extract_toc(content),
            body: content.to_string(),
            source_path: path.to_path_buf(),
        })
    }
}

/// Split a `YYYY-MM-DD-slug` filename stem into its date and slug.
fn parse_dated_filename(stem: &str) -> Option<(NaiveDate, String)> {
    if stem.len() < 12 || !stem.is_char_boundary(10) || stem.as_bytes()[10] != b'-' {
        return None;
    }

    let date = NaiveDate::parse_from_str(&stem[..10], "%Y-%m-%d").ok()?;
    let slug = slugify(&stem[11..]);

    if slug.is_empty() {
        return None;
    }

    Some((date, slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_post_with_filename_identity() {
        let source = r#"---
title: Circuit Breakers in Practice
tags: [resilience]
---

Tripping open under sustained failure.

## The Pattern
"#;

        let post = Post::parse(Path::new("posts/2024-03-01-circuit-breakers.md"), source).unwrap();

        assert_eq!(post.slug, "circuit-breakers");
        assert_eq!(post.date, ymd(2024, 3, 1));
        assert_eq!(post.title, "Circuit Breakers in Practice");
        assert_eq!(post.tags, vec!["resilience"]);
        assert_eq!(post.excerpt, "Tripping open under sustained failure.");
        assert_eq!(post.toc.len(), 1);
    }

    #[test]
    fn frontmatter_date_overrides_filename() {
        let source = "---\ntitle: Backdated\ndate: 2023-12-31\n---\nBody.";

        let post = Post::parse(Path::new("2024-01-01-backdated.md"), source).unwrap();

        assert_eq!(post.date, ymd(2023, 12, 31));
        assert_eq!(post.slug, "backdated");
    }

    #[test]
    fn frontmatter_slug_overrides_filename() {
        let source = "---\ntitle: Renamed\nslug: Better Name\n---\nBody.";

        let post = Post::parse(Path::new("2024-01-01-original.md"), source).unwrap();

        assert_eq!(post.slug, "better-name");
    }

    #[test]
    fn undated_filename_without_frontmatter_date_is_rejected() {
        let source = "---\ntitle: No Date\n---\nBody.";

        let result = Post::parse(Path::new("no-date.md"), source);

        assert!(matches!(result, Err(PostError::MissingDate { .. })));
    }

    #[test]
    fn undated_filename_with_frontmatter_date_keeps_stem_slug() {
        let source = "---\ntitle: Evergreen\ndate: 2022-06-15\n---\nBody.";

        let post = Post::parse(Path::new("posts/about_the_blog.md"), source).unwrap();

        assert_eq!(post.slug, "about-the-blog");
        assert_eq!(post.date, ymd(2022, 6, 15));
    }

    #[test]
    fn post_without_frontmatter_is_rejected() {
        let result = Post::parse(Path::new("2024-01-01-bare.md"), "# Bare\n\nNo frontmatter.");

        assert!(matches!(result, Err(PostError::MissingFrontmatter { .. })));
    }

    #[test]
    fn dated_filename_parsing() {
        assert_eq!(
            parse_dated_filename("2024-03-01-hello-world"),
            Some((ymd(2024, 3, 1), "hello-world".to_string()))
        );
        assert_eq!(parse_dated_filename("2024-13-01-bad-month"), None);
        assert_eq!(parse_dated_filename("hello-world"), None);
        assert_eq!(parse_dated_filename("2024-03-01-"), None);
        assert_eq!(parse_dated_filename("2024-03-01"), None);
    }
}
