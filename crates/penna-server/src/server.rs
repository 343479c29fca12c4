//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use penna_site::{BuildConfig, SiteBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing posts
    pub posts_dir: PathBuf,

    /// Path to the site configuration file
    pub config_path: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("posts"),
            config_path: PathBuf::from("blog.toml"),
            port: 4000,
            host: "0.0.0.0".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}:{1}")]
    InvalidAddress(String, u16),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Initial build failed: {0}")]
    BuildError(String),
}

/// Shared server state.
struct ServerState {
    hub: ReloadHub,
}

/// Loader invoked to re-read the site configuration from disk when the
/// config file changes while the server is running.
pub type ConfigReloadFn = Box<dyn Fn() -> Result<BuildConfig, String> + Send + Sync>;

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    build: BuildConfig,
    reload_config: Option<ConfigReloadFn>,
}

impl DevServer {
    /// Create a new development server around a build configuration.
    ///
    /// The live reload script is always injected into dev builds.
    pub fn new(config: DevServerConfig, mut build: BuildConfig) -> Self {
        build.live_reload = true;
        Self {
            config,
            build,
            reload_config: None,
        }
    }

    /// Set the loader used to re-read the site configuration when the
    /// config file changes. Without one, rebuilds keep the configuration
    /// the server started with.
    pub fn with_config_reload(
        mut self,
        loader: impl Fn() -> Result<BuildConfig, String> + Send + Sync + 'static,
    ) -> Self {
        self.reload_config = Some(Box::new(loader));
        self
    }

    /// Start the development server.
    ///
    /// Runs an initial build, then serves the output directory while
    /// watching the posts directory and site configuration for changes.
    /// A failed initial build or bind is fatal; a failed rebuild keeps the
    /// previous output serving.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.config.host.clone(), self.config.port))?;

        let result = SiteBuilder::new(self.build.clone())
            .build()
            .await
            .map_err(|e| ServerError::BuildError(e.to_string()))?;

        tracing::info!(
            "Built {} posts in {}ms",
            result.posts,
            result.duration_ms
        );

        let state = Arc::new(ServerState {
            hub: ReloadHub::new(),
        });

        // Watch posts and the config file
        let watch_paths = vec![
            self.config.posts_dir.clone(),
            self.config.config_path.clone(),
        ];

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        // Spawn the rebuild loop
        let state_clone = Arc::clone(&state);
        let mut build = self.build.clone();
        let reload_config = self.reload_config;
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&mut build, &reload_config, &state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        // Build router
        let app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .fallback_service(ServeDir::new(&self.build.output_dir))
            .with_state(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            // 0.0.0.0 binds all interfaces but is not a browsable address
            let browse_host = if self.config.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.config.host
            };
            let url = format!("http://{}:{}", browse_host, self.config.port);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handle a file watch event: rebuild and tell clients to reload.
///
/// A config change re-reads the configuration from disk first, so edits to
/// the config file take effect on the next rebuild rather than only after a
/// server restart.
async fn handle_watch_event(
    build: &mut BuildConfig,
    reload_config: &Option<ConfigReloadFn>,
    state: &Arc<ServerState>,
    event: WatchEvent,
) {
    match &event {
        WatchEvent::PostModified(path) => {
            tracing::info!("Post modified: {}", path.display());
        }
        WatchEvent::ConfigModified(path) => {
            tracing::info!("Config modified: {}", path.display());
            if let Some(reload) = reload_config {
                match reload() {
                    Ok(fresh) => apply_config_reload(build, fresh),
                    Err(e) => {
                        // Keep the previous configuration
                        tracing::warn!("Config reload failed: {}", e);
                    }
                }
            }
        }
        WatchEvent::Created(path) | WatchEvent::Deleted(path) | WatchEvent::Modified(path) => {
            tracing::debug!("Changed: {}", path.display());
        }
    }

    match SiteBuilder::new(build.clone()).build().await {
        Ok(result) => {
            tracing::info!("Rebuilt {} posts in {}ms", result.posts, result.duration_ms);
            state.hub.send(ReloadMessage::Reload);
        }
        Err(e) => {
            // Keep serving the previous output
            tracing::warn!("Rebuild failed: {}", e);
        }
    }
}

/// Fold a freshly loaded configuration into the running build configuration.
///
/// The posts and output directories are pinned at startup: the file watcher
/// and static file service were created against them, so changing either
/// requires a server restart. The drafts override from the command line also
/// survives config edits.
fn apply_config_reload(build: &mut BuildConfig, mut fresh: BuildConfig) {
    fresh.live_reload = true;
    fresh.include_drafts = build.include_drafts;
    fresh.posts_dir = build.posts_dir.clone();
    fresh.output_dir = build.output_dir.clone();
    *build = fresh;
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    // Send connected message
    let Ok(msg) = serde_json::to_string(&ReloadMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    // Forward reload messages to the client
    while let Ok(reload_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&reload_msg) else {
            break;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_binds_all_interfaces_on_4000() {
        let config = DevServerConfig::default();

        assert_eq!(config.port, 4000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn dev_builds_always_inject_live_reload() {
        let server = DevServer::new(DevServerConfig::default(), BuildConfig::default());

        assert!(server.build.live_reload);
    }

    #[test]
    fn default_address_parses() {
        let config = DevServerConfig::default();
        let addr: Result<SocketAddr, _> = format!("{}:{}", config.host, config.port).parse();

        assert_eq!(addr.unwrap().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn config_reload_pins_directories_and_overrides() {
        let mut build = BuildConfig {
            posts_dir: PathBuf::from("posts"),
            output_dir: PathBuf::from("dist"),
            include_drafts: true,
            live_reload: true,
            ..Default::default()
        };

        let fresh = BuildConfig {
            title: "Renamed".to_string(),
            posts_dir: PathBuf::from("elsewhere"),
            output_dir: PathBuf::from("out"),
            include_drafts: false,
            live_reload: false,
            ..Default::default()
        };

        apply_config_reload(&mut build, fresh);

        assert_eq!(build.title, "Renamed");
        assert_eq!(build.posts_dir, PathBuf::from("posts"));
        assert_eq!(build.output_dir, PathBuf::from("dist"));
        assert!(build.include_drafts);
        assert!(build.live_reload);
    }

    #[tokio::test]
    async fn config_change_rebuilds_with_fresh_config() {
        let temp = tempfile::tempdir().unwrap();
        let posts_dir = temp.path().join("posts");
        let output_dir = temp.path().join("dist");
        std::fs::create_dir_all(&posts_dir).unwrap();

        let mut build = BuildConfig {
            posts_dir: posts_dir.clone(),
            output_dir: output_dir.clone(),
            title: "Old Title".to_string(),
            live_reload: true,
            ..Default::default()
        };

        let template = build.clone();
        let reload: Option<ConfigReloadFn> = Some(Box::new(move || {
            let mut fresh = template.clone();
            fresh.title = "New Title".to_string();
            Ok(fresh)
        }));

        let state = Arc::new(ServerState {
            hub: ReloadHub::new(),
        });
        let mut rx = state.hub.subscribe();

        handle_watch_event(
            &mut build,
            &reload,
            &state,
            WatchEvent::ConfigModified(PathBuf::from("blog.toml")),
        )
        .await;

        assert_eq!(build.title, "New Title");
        let index = std::fs::read_to_string(output_dir.join("index.html")).unwrap();
        assert!(index.contains("New Title"));
        assert!(matches!(rx.try_recv(), Ok(ReloadMessage::Reload)));
    }
}
