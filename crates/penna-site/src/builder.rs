//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pulldown_cmark::{html, Event, Parser, Tag, TagEnd};
use rayon::prelude::*;

use penna_content::{markdown_options, slugify, ContentStore, Post, StoreError};

use crate::assets::AssetPipeline;
use crate::feed::render_feed;
use crate::templates::{
    IndexContext, PostContext, PostSummary, SiteContext, TagContext, TagRef, TagSummary,
    TagsContext, TemplateEngine, TocEntry,
};

/// Configuration for building the blog.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source posts directory
    pub posts_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Site description
    pub description: String,

    /// Site author
    pub author: String,

    /// Posts per index page
    pub posts_per_page: usize,

    /// Minify CSS output
    pub minify: bool,

    /// Include draft posts
    pub include_drafts: bool,

    /// Inject the live reload client script into every page
    pub live_reload: bool,

    /// Paths to extra CSS stylesheets to include
    pub styles: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("posts"),
            output_dir: PathBuf::from("dist"),
            base_url: "/".to_string(),
            title: "A Blog".to_string(),
            description: String::new(),
            author: String::new(),
            posts_per_page: 10,
            minify: true,
            include_drafts: false,
            live_reload: false,
            styles: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of posts rendered
    pub posts: usize,

    /// Total HTML pages written
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load content: {0}")]
    ContentError(#[from] StoreError),

    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let store = ContentStore::load(&self.config.posts_dir, self.config.include_drafts)?;

        if store.is_empty() {
            tracing::warn!(
                "No posts found in {}; building an empty site",
                self.config.posts_dir.display()
            );
        }

        // Post pages render independently, so build them in parallel
        let results: Vec<Result<(), BuildError>> = store
            .posts()
            .par_iter()
            .map(|post| self.build_post_page(post))
            .collect();

        for result in results {
            result?;
        }

        let index_pages = self.build_index_pages(store.posts())?;
        let tag_pages = self.build_tag_pages(&store)?;

        self.generate_feed(store.posts())?;
        self.generate_search_index(store.posts())?;
        self.generate_sitemap(&store)?;
        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            posts: store.len(),
            pages: store.len() + index_pages + tag_pages,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn site_context(&self) -> SiteContext {
        SiteContext {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            base_url: self.config.base_url.clone(),
            live_reload: self.config.live_reload,
        }
    }

    /// URL of a post page.
    fn post_url(&self, post: &Post) -> String {
        format!("{}{}/", self.config.base_url, post.slug)
    }

    /// URL of a tag page.
    fn tag_url(&self, tag: &str) -> String {
        format!("{}tags/{}/", self.config.base_url, slugify(tag))
    }

    /// URL of an index page (1-based).
    fn index_url(&self, page: usize) -> String {
        if page == 1 {
            self.config.base_url.clone()
        } else {
            format!("{}page/{}/", self.config.base_url, page)
        }
    }

    fn summarize(&self, post: &Post) -> PostSummary {
        PostSummary {
            title: post.title.clone(),
            url: self.post_url(post),
            date: post.date.format("%B %-d, %Y").to_string(),
            excerpt: post.excerpt.clone(),
            tags: post
                .tags
                .iter()
                .map(|tag| TagRef {
                    name: tag.clone(),
                    url: self.tag_url(tag),
                })
                .collect(),
        }
    }

    /// Build a single post page at `<output>/<slug>/index.html`.
    fn build_post_page(&self, post: &Post) -> Result<(), BuildError> {
        let content = render_markdown(&post.body);

        let context = PostContext {
            site: self.site_context(),
            title: post.title.clone(),
            date: post.date.format("%B %-d, %Y").to_string(),
            tags: post
                .tags
                .iter()
                .map(|tag| TagRef {
                    name: tag.clone(),
                    url: self.tag_url(tag),
                })
                .collect(),
            toc: post
                .toc
                .iter()
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            content,
        };

        let html = self
            .templates
            .render_post(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self
            .config
            .output_dir
            .join(&post.slug)
            .join("index.html");

        write_page(&output_path, &html)
    }

    /// Build the paginated chronological index. Returns the page count.
    fn build_index_pages(&self, posts: &[Post]) -> Result<usize, BuildError> {
        let per_page = self.config.posts_per_page.max(1);

        // An empty store still gets an index page
        let mut chunks: Vec<&[Post]> = posts.chunks(per_page).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        let total_pages = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            let page = i + 1;

            let context = IndexContext {
                site: self.site_context(),
                posts: chunk.iter().map(|p| self.summarize(p)).collect(),
                page,
                total_pages,
                prev_url: (page > 1).then(|| self.index_url(page - 1)),
                next_url: (page < total_pages).then(|| self.index_url(page + 1)),
            };

            let html = self
                .templates
                .render_index(&context)
                .map_err(|e| BuildError::TemplateError(e.to_string()))?;

            let output_path = if page == 1 {
                self.config.output_dir.join("index.html")
            } else {
                self.config
                    .output_dir
                    .join("page")
                    .join(page.to_string())
                    .join("index.html")
            };

            write_page(&output_path, &html)?;
        }

        Ok(total_pages)
    }

    /// Build per-tag pages and the tag directory. Returns the page count.
    fn build_tag_pages(&self, store: &ContentStore) -> Result<usize, BuildError> {
        let groups = store.by_tag();

        let summaries: Vec<TagSummary> = groups
            .iter()
            .map(|group| TagSummary {
                name: group.name.clone(),
                url: format!("{}tags/{}/", self.config.base_url, group.slug),
                count: group.posts.len(),
            })
            .collect();

        let directory = self
            .templates
            .render_tags(&TagsContext {
                site: self.site_context(),
                tags: summaries,
            })
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_page(
            &self.config.output_dir.join("tags").join("index.html"),
            &directory,
        )?;

        let mut pages = 1;

        for group in &groups {
            let context = TagContext {
                site: self.site_context(),
                tag: group.name.clone(),
                posts: group.posts.iter().map(|p| self.summarize(p)).collect(),
            };

            let html = self
                .templates
                .render_tag(&context)
                .map_err(|e| BuildError::TemplateError(e.to_string()))?;

            let output_path = self
                .config
                .output_dir
                .join("tags")
                .join(&group.slug)
                .join("index.html");

            write_page(&output_path, &html)?;
            pages += 1;
        }

        Ok(pages)
    }

    /// Generate the RSS feed.
    fn generate_feed(&self, posts: &[Post]) -> Result<(), BuildError> {
        let feed = render_feed(
            &self.config.title,
            &self.config.description,
            &self.config.base_url,
            posts,
        );

        fs::write(self.config.output_dir.join("feed.xml"), feed)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate the client-side search index.
    fn generate_search_index(&self, posts: &[Post]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = posts
            .iter()
            .map(|post| {
                serde_json::json!({
                    "title": post.title,
                    "description": post.description.clone().unwrap_or_default(),
                    "tags": post.tags,
                    "excerpt": post.excerpt,
                    "url": self.post_url(post),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate sitemap.xml and robots.txt.
    fn generate_sitemap(&self, store: &ContentStore) -> Result<(), BuildError> {
        let base = self.config.base_url.trim_end_matches('/');

        let mut locs = vec![format!("{}/", base)];
        locs.extend(store.posts().iter().map(|p| {
            format!("{}/{}/", base, p.slug)
        }));
        locs.push(format!("{}/tags/", base));
        locs.extend(store.by_tag().iter().map(|group| {
            format!("{}/tags/{}/", base, group.slug)
        }));

        let urls: Vec<String> = locs
            .iter()
            .map(|loc| format!("  <url>\n    <loc>{}</loc>\n  </url>", loc))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.config.base_url
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let js = AssetPipeline::generate_js();
        fs::write(assets_dir.join("main.js"), js)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Copy configured extra stylesheets
        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if source_path.exists() {
                let filename = source_path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                fs::write(assets_dir.join(filename), content)
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
                tracing::info!("Copied stylesheet from {}", style_path);
            } else {
                tracing::warn!("Stylesheet not found: {}", style_path);
            }
        }

        Ok(())
    }
}

/// Render markdown to HTML, injecting slugified anchor ids into headings
/// so the table of contents can link to them.
pub fn render_markdown(content: &str) -> String {
    let mut events: Vec<Event> = Vec::new();
    let mut heading_start: Option<usize> = None;
    let mut heading_text = String::new();

    for event in Parser::new_ext(content, markdown_options()) {
        match &event {
            Event::Start(Tag::Heading { .. }) => {
                heading_start = Some(events.len());
                heading_text.clear();
            }

            Event::Text(text) | Event::Code(text) if heading_start.is_some() => {
                heading_text.push_str(text);
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some(idx) = heading_start.take() {
                    if let Event::Start(Tag::Heading {
                        level,
                        id: None,
                        classes,
                        attrs,
                    }) = events[idx].clone()
                    {
                        events[idx] = Event::Start(Tag::Heading {
                            level,
                            id: Some(slugify(&heading_text).into()),
                            classes,
                            attrs,
                        });
                    }
                }
            }

            _ => {}
        }

        events.push(event);
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}

/// Write a rendered page, creating parent directories as needed.
fn write_page(path: &Path, html: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }

    fs::write(path, html).map_err(|e| BuildError::WriteError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_post(dir: &Path, name: &str, frontmatter: &str, body: &str) {
        fs::write(dir.join(name), format!("---\n{}\n---\n\n{}", frontmatter, body)).unwrap();
    }

    #[tokio::test]
    async fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        write_post(
            &posts,
            "2024-03-01-circuit-breakers.md",
            "title: Circuit Breakers\ntags: [resilience]",
            "Tripping open under sustained failure.\n\n## The Pattern\n\nDetails.",
        );

        let config = BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            ..Default::default()
        };

        let result = SiteBuilder::new(config).build().await.unwrap();

        assert_eq!(result.posts, 1);
        assert!(out.join("index.html").exists());
        assert!(out.join("circuit-breakers/index.html").exists());
        assert!(out.join("tags/index.html").exists());
        assert!(out.join("tags/resilience/index.html").exists());
        assert!(out.join("feed.xml").exists());
        assert!(out.join("sitemap.xml").exists());
        assert!(out.join("robots.txt").exists());
        assert!(out.join("assets/main.css").exists());
    }

    #[tokio::test]
    async fn empty_posts_directory_still_builds() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();

        let result = SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        assert_eq!(result.posts, 0);

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("No posts yet."));
    }

    #[tokio::test]
    async fn paginates_the_index() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        for day in 1..=3 {
            write_post(
                &posts,
                &format!("2024-01-0{}-post-{}.md", day, day),
                &format!("title: Post {}", day),
                "Body.",
            );
        }

        let result = SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            posts_per_page: 1,
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        assert_eq!(result.posts, 3);
        assert!(out.join("page/2/index.html").exists());
        assert!(out.join("page/3/index.html").exists());
        assert!(!out.join("page/4").exists());

        // Page 1 is the newest post and links older, not newer
        let first = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(first.contains("Post 3"));
        assert!(first.contains("/page/2/"));
        assert!(!first.contains("Newer"));

        let last = fs::read_to_string(out.join("page/3/index.html")).unwrap();
        assert!(last.contains("Post 1"));
        assert!(last.contains("Newer"));
        assert!(!last.contains("Older"));
    }

    #[tokio::test]
    async fn heading_anchors_match_the_toc() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        write_post(
            &posts,
            "2024-01-01-anchors.md",
            "title: Anchors",
            "Intro.\n\n## False Positives\n\nText.",
        );

        SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        let page = fs::read_to_string(out.join("anchors/index.html")).unwrap();
        assert!(page.contains(r##"id="false-positives""##));
        assert!(page.contains(r##"href="#false-positives""##));
    }

    #[tokio::test]
    async fn generates_search_index() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        write_post(
            &posts,
            "2024-01-01-bloom-filters.md",
            "title: Bloom Filters\ntags: [data-structures]",
            "A probabilistic set.",
        );

        SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        assert!(index.contains("Bloom Filters"));
        assert!(index.contains("data-structures"));
        assert!(index.contains("/bloom-filters/"));
    }

    #[tokio::test]
    async fn case_differing_tags_share_one_page() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        write_post(&posts, "2024-01-01-alpha.md", "title: Alpha\ntags: [rust]", "a");
        write_post(&posts, "2024-02-01-beta.md", "title: Beta\ntags: [Rust]", "b");

        SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        // One page lists both posts instead of the spellings overwriting
        // each other at the same path
        let page = fs::read_to_string(out.join("tags/rust/index.html")).unwrap();
        assert!(page.contains("Alpha"));
        assert!(page.contains("Beta"));

        let directory = fs::read_to_string(out.join("tags/index.html")).unwrap();
        assert_eq!(directory.matches("/tags/rust/").count(), 1);
    }

    #[tokio::test]
    async fn sitemap_lists_posts_and_tags() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts");
        let out = temp.path().join("dist");

        fs::create_dir_all(&posts).unwrap();
        write_post(
            &posts,
            "2024-01-01-first.md",
            "title: First\ntags: [meta]",
            "Hello.",
        );

        SiteBuilder::new(BuildConfig {
            posts_dir: posts,
            output_dir: out.clone(),
            base_url: "https://example.com/".to_string(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/first/</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/tags/meta/</loc>"));
    }

    #[test]
    fn markdown_rendering_keeps_explicit_heading_ids() {
        let html = render_markdown("## Custom {#custom-id}\n\nBody.");

        // Without the heading-attributes extension the literal text stays,
        // and our injected slug covers the anchor
        assert!(html.contains("<h2"));
        assert!(html.contains("id="));
    }
}
