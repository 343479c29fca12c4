//! Development server command.

use std::path::Path;

use anyhow::Result;
use penna_server::{DevServer, DevServerConfig};

use crate::config::load_config;

/// Run the dev server.
pub async fn run(
    config_path: &Path,
    port: Option<u16>,
    host: Option<String>,
    open: bool,
    drafts: bool,
) -> Result<()> {
    let file_config = load_config(config_path)?;

    let mut build = file_config.build_config();
    build.include_drafts = drafts;

    let config = DevServerConfig {
        posts_dir: build.posts_dir.clone(),
        config_path: config_path.to_path_buf(),
        port: port.unwrap_or(file_config.serve.port),
        host: host.unwrap_or(file_config.serve.host),
        open,
    };

    tracing::info!(
        "Starting development server on {}:{}",
        config.host,
        config.port
    );

    // Re-read the config file when it changes, so edits apply to rebuilds
    let reload_path = config_path.to_path_buf();
    DevServer::new(config, build)
        .with_config_reload(move || {
            load_config(&reload_path)
                .map(|file| file.build_config())
                .map_err(|e| e.to_string())
        })
        .start()
        .await?;

    Ok(())
}
