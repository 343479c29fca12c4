//! Content store: discovery and ordering of posts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::parser::slugify;
use crate::post::{Post, PostError};

/// The loaded collection of posts, newest first.
#[derive(Debug, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
}

/// Posts grouped under one tag slug.
///
/// Spellings that slugify to the same value ("Rust" and "rust") land in the
/// same group, so each slug maps to exactly one tag page.
#[derive(Debug)]
pub struct TagGroup<'a> {
    /// Display name: the first spelling seen in store order
    pub name: String,

    /// URL slug shared by every spelling of the tag
    pub slug: String,

    /// Posts under this tag, newest first
    pub posts: Vec<&'a Post>,
}

/// Errors that can occur when loading the content store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read post: {0}")]
    ReadError(String),

    #[error(transparent)]
    PostError(#[from] PostError),
}

impl ContentStore {
    /// Load all posts from a directory.
    ///
    /// Walks the directory for `.md`/`.markdown` files and parses each one.
    /// A missing or empty directory yields an empty store rather than an
    /// error; the posts directory is not a build-time dependency.
    pub fn load(dir: &Path, include_drafts: bool) -> Result<Self, StoreError> {
        let mut posts = Vec::new();

        if !dir.exists() {
            tracing::warn!("Posts directory not found: {}", dir.display());
            return Ok(Self { posts });
        }

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" && ext != "markdown" {
                continue;
            }

            let source = fs::read_to_string(path)
                .map_err(|e| StoreError::ReadError(format!("{}: {}", path.display(), e)))?;

            let post = Post::parse(path, &source)?;

            if post.draft && !include_drafts {
                tracing::debug!("Skipping draft: {}", path.display());
                continue;
            }

            posts.push(post);
        }

        // Deterministic ordering: newest first, slug as tie-breaker
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        Ok(Self { posts })
    }

    /// All posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Group posts by tag slug.
    ///
    /// Groups are ordered lexicographically by slug; posts within a group
    /// keep the store's newest-first order. This is an informal many-to-many
    /// index with no referential integrity beyond what the frontmatter
    /// declares. Case-differing spellings of a tag merge into one group and
    /// are logged, since they would otherwise collide on the same page path.
    pub fn by_tag(&self) -> Vec<TagGroup<'_>> {
        let mut groups: BTreeMap<String, TagGroup<'_>> = BTreeMap::new();

        for post in &self.posts {
            for tag in &post.tags {
                let slug = slugify(tag);
                if slug.is_empty() {
                    continue;
                }

                let group = groups.entry(slug.clone()).or_insert_with(|| TagGroup {
                    name: tag.clone(),
                    slug,
                    posts: Vec::new(),
                });

                if group.name != *tag {
                    tracing::warn!(
                        "Tag spellings \"{}\" and \"{}\" share the slug \"{}\"",
                        group.name,
                        tag,
                        group.slug
                    );
                }

                group.posts.push(post);
            }
        }

        groups.into_values().collect()
    }
}
