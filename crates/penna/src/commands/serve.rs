//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::load_config;

/// Run the serve command.
///
/// Serves an already-built output directory; this is the command the
/// container image runs, bound to all interfaces on the declared port.
pub async fn run(
    config_path: &Path,
    port: Option<u16>,
    host: Option<String>,
    dir: Option<PathBuf>,
) -> Result<()> {
    let file_config = load_config(config_path)?;

    let dir = dir.unwrap_or_else(|| PathBuf::from(&file_config.site.output));
    let port = port.unwrap_or(file_config.serve.port);
    let host = host.unwrap_or(file_config.serve.host);

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'penna build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
