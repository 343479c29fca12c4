//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use penna_site::SiteBuilder;

use crate::config::load_config;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
    drafts: bool,
) -> Result<()> {
    tracing::info!("Building site...");

    let file_config = load_config(config_path)?;

    let mut config = file_config.build_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }
    config.include_drafts = drafts;

    let result = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} posts ({} pages) in {}ms",
        result.posts,
        result.pages,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
