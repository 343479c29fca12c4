//! Template engine for rendering blog pages.

use minijinja::{context, Environment};

/// Site-wide values available to every template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SiteContext {
    /// Site title
    pub title: String,
    /// Site description
    pub description: String,
    /// Site author
    pub author: String,
    /// Base URL
    pub base_url: String,
    /// Whether to inject the live reload client script
    pub live_reload: bool,
}

/// A tag reference with its page URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TagRef {
    /// Tag name as written in frontmatter
    pub name: String,
    /// URL of the tag page
    pub url: String,
}

/// A tag with its post count, for the tag directory page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TagSummary {
    pub name: String,
    pub url: String,
    pub count: usize,
}

/// A post as listed on index and tag pages.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostSummary {
    /// Post title
    pub title: String,
    /// URL of the post page
    pub url: String,
    /// Publication date, pre-formatted for display
    pub date: String,
    /// Plain-text excerpt
    pub excerpt: String,
    /// Tags with links
    pub tags: Vec<TagRef>,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a post page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostContext {
    pub site: SiteContext,
    /// Post title
    pub title: String,
    /// Publication date, pre-formatted for display
    pub date: String,
    /// Tags with links
    pub tags: Vec<TagRef>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Rendered post HTML
    pub content: String,
}

/// Context for rendering an index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexContext {
    pub site: SiteContext,
    /// Posts on this page, newest first
    pub posts: Vec<PostSummary>,
    /// 1-based page number
    pub page: usize,
    /// Total number of index pages
    pub total_pages: usize,
    /// URL of the newer page, if any
    pub prev_url: Option<String>,
    /// URL of the older page, if any
    pub next_url: Option<String>,
}

/// Context for rendering the tag directory page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TagsContext {
    pub site: SiteContext,
    /// All tags, lexicographic
    pub tags: Vec<TagSummary>,
}

/// Context for rendering a single tag page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TagContext {
    pub site: SiteContext,
    /// Tag name
    pub tag: String,
    /// Posts under this tag, newest first
    pub posts: Vec<PostSummary>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the default theme templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())
            .expect("Failed to add post template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        env.add_template_owned("tags.html".to_string(), TAGS_TEMPLATE.to_string())
            .expect("Failed to add tags template");

        env.add_template_owned("tag.html".to_string(), TAG_TEMPLATE.to_string())
            .expect("Failed to add tag template");

        Self { env }
    }

    /// Render a post page.
    pub fn render_post(&self, ctx: &PostContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("post.html")?;

        tmpl.render(context! {
            site => &ctx.site,
            title => &ctx.title,
            date => &ctx.date,
            tags => &ctx.tags,
            toc => &ctx.toc,
            content => &ctx.content,
        })
    }

    /// Render an index page.
    pub fn render_index(&self, ctx: &IndexContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            site => &ctx.site,
            title => "Posts",
            posts => &ctx.posts,
            page => ctx.page,
            total_pages => ctx.total_pages,
            prev_url => &ctx.prev_url,
            next_url => &ctx.next_url,
        })
    }

    /// Render the tag directory page.
    pub fn render_tags(&self, ctx: &TagsContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("tags.html")?;

        tmpl.render(context! {
            site => &ctx.site,
            title => "Tags",
            tags => &ctx.tags,
        })
    }

    /// Render a single tag page.
    pub fn render_tag(&self, ctx: &TagContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("tag.html")?;

        tmpl.render(context! {
            site => &ctx.site,
            title => &ctx.tag,
            tag => &ctx.tag,
            posts => &ctx.posts,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site.title }}</title>
  <meta name="description" content="{{ site.description }}">
  <link rel="alternate" type="application/rss+xml" title="{{ site.title }}" href="{{ site.base_url }}feed.xml">
  <link rel="stylesheet" href="{{ site.base_url }}assets/main.css">
</head>
<body>
  <header class="site-header">
    <a href="{{ site.base_url }}" class="site-title">{{ site.title }}</a>
    <nav class="site-nav">
      <a href="{{ site.base_url }}">Posts</a>
      <a href="{{ site.base_url }}tags/">Tags</a>
      <a href="{{ site.base_url }}feed.xml">Feed</a>
    </nav>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
    <p>&copy; {{ site.author }}</p>
  </footer>
  <script src="{{ site.base_url }}assets/main.js"></script>
  {% if site.live_reload %}<script src="/__reload.js"></script>
  {% endif %}
</body>
</html>"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <header class="post-header">
    <h1>{{ title }}</h1>
    <p class="post-meta">
      <time>{{ date }}</time>
      {% for tag in tags %}<a class="tag" href="{{ tag.url }}">{{ tag.name }}</a>{% endfor %}
    </p>
  </header>
  <div class="content">
    {{ content | safe }}
  </div>
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="post-list">
  {% if not posts %}
  <p class="empty">No posts yet.</p>
  {% endif %}
  {% for post in posts %}
  <article class="post-entry">
    <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
    <p class="post-meta">
      <time>{{ post.date }}</time>
      {% for tag in post.tags %}<a class="tag" href="{{ tag.url }}">{{ tag.name }}</a>{% endfor %}
    </p>
    {% if post.excerpt %}<p class="excerpt">{{ post.excerpt }}</p>{% endif %}
  </article>
  {% endfor %}
</section>

{% if total_pages > 1 %}
<nav class="pagination">
  {% if prev_url %}<a class="newer" href="{{ prev_url }}">&larr; Newer</a>{% endif %}
  <span class="page-number">Page {{ page }} of {{ total_pages }}</span>
  {% if next_url %}<a class="older" href="{{ next_url }}">Older &rarr;</a>{% endif %}
</nav>
{% endif %}
{% endblock %}"##;

const TAGS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="tag-list">
  <h1>Tags</h1>
  <ul>
  {% for tag in tags %}
    <li><a href="{{ tag.url }}">{{ tag.name }}</a> <span class="count">({{ tag.count }})</span></li>
  {% endfor %}
  </ul>
</section>
{% endblock %}"##;

const TAG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="post-list">
  <h1>Tagged &ldquo;{{ tag }}&rdquo;</h1>
  {% for post in posts %}
  <article class="post-entry">
    <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
    <p class="post-meta"><time>{{ post.date }}</time></p>
    {% if post.excerpt %}<p class="excerpt">{{ post.excerpt }}</p>{% endif %}
  </article>
  {% endfor %}
</section>
{% endblock %}"##;
