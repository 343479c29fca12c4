//! Initialize a blog in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command, scaffolding into the current directory.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    run_in(Path::new("."), config_path, yes).await
}

/// Initialize a blog under the given root directory.
///
/// A relative config path is resolved against the root.
pub async fn run_in(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing penna blog...");

    let posts_dir = root.join("posts");
    let config_path = root.join(config_path);

    // Check if posts already exists
    if posts_dir.exists() {
        if !yes {
            tracing::warn!("posts/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&posts_dir).context("Failed to create posts directory")?;
    }

    // Create default config
    if !config_path.exists() || yes {
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    // Create welcome post
    let welcome_path = posts_dir.join("2024-01-01-hello-world.md");
    if !welcome_path.exists() || yes {
        fs::write(&welcome_path, DEFAULT_WELCOME).context("Failed to write welcome post")?;
        tracing::info!("Created posts/2024-01-01-hello-world.md");
    }

    // Create a second sample post showing tags and code blocks
    let sample_path = posts_dir.join("2024-01-02-writing-posts.md");
    if !sample_path.exists() || yes {
        fs::write(&sample_path, DEFAULT_SAMPLE).context("Failed to write sample post")?;
        tracing::info!("Created posts/2024-01-02-writing-posts.md");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'penna dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Penna Configuration

[site]
# Site title
title = "My Blog"

# Site description for meta tags and the feed
description = "Notes on software engineering"

# Author shown in the footer
author = "Your Name"

# Base URL (for deployment)
base_url = "/"

# Source directory for posts
posts = "posts"

# Output directory for the built site
output = "dist"

[build]
# Enable CSS minification
minify = true

# Posts per index page
posts_per_page = 10

[serve]
# Port and host for 'penna dev' and 'penna serve'
port = 4000
host = "0.0.0.0"
"#;

const DEFAULT_WELCOME: &str = r#"---
title: Hello, World
tags: [meta]
---

Welcome to your new blog, powered by **penna**.

Posts live in the `posts/` directory as markdown files named
`YYYY-MM-DD-slug.md`. The filename gives each post its date and URL.

## Next Steps

- Edit `blog.toml` to set your site title and author.
- Run `penna dev` and start writing; the browser reloads as you save.
- Run `penna build` when you are ready to deploy the `dist/` directory.
"#;

const DEFAULT_SAMPLE: &str = r#"---
title: Writing Posts
tags: [meta, markdown]
description: Frontmatter, tags, drafts, and code blocks.
---

Every post starts with a frontmatter block:

```yaml
---
title: Writing Posts
tags: [meta, markdown]
draft: false
---
```

The first paragraph of prose becomes the excerpt shown on index pages.

## Code Blocks

Fenced code blocks are rendered with a copy button:

```rust
fn main() {
    println!("hello from penna");
}
```

## Drafts

Set `draft: true` in the frontmatter to keep a post out of builds until
it is ready. Pass `--drafts` to `penna build` or `penna dev` to preview
drafts locally.
"#;
