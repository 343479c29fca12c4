//! Site configuration (blog.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use penna_site::BuildConfig;
use serde::Deserialize;

/// Configuration file structure (blog.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub serve: ServeSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_posts_dir")]
    pub posts: String,
    #[serde(default = "default_output")]
    pub output: String,
    /// Paths to extra CSS stylesheets to include
    pub styles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
}

#[derive(Debug, Deserialize)]
pub struct ServeSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            author: String::new(),
            base_url: default_base_url(),
            posts: default_posts_dir(),
            output: default_output(),
            styles: None,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
            posts_per_page: default_posts_per_page(),
        }
    }
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_title() -> String {
    "A Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_posts_dir() -> String {
    "posts".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_posts_per_page() -> usize {
    10
}
fn default_port() -> u16 {
    4000
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Load configuration from blog.toml if it exists.
///
/// A missing file yields defaults; a malformed one is a fatal
/// configuration error.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Translate the file configuration into a build configuration.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            posts_dir: PathBuf::from(&self.site.posts),
            output_dir: PathBuf::from(&self.site.output),
            base_url: self.site.base_url.clone(),
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            author: self.site.author.clone(),
            posts_per_page: self.build.posts_per_page,
            minify: self.build.minify,
            styles: self.site.styles.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}
