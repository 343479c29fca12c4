//! Development server with live reload for the penna blog.
//!
//! Watches the posts directory, rebuilds the site on change, and serves the
//! output with WebSocket-based page reload.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{ConfigReloadFn, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
