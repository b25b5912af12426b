//! HTTP server for docnav.
//!
//! Serves the navigation structure, document resolution, and sidebar
//! expand state as JSON over axum.
//!
//! # Quick Start
//!
//! ```ignore
//! use docnav_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         ..Default::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET /api/docs/global-structure    sidebar structure of every category
//! GET /api/docs/{*slug}             document, 307 redirect, or error
//! GET /api/sidebar/state            expand state of sidebar groups
//! PUT /api/sidebar/state/{*id}      set expand state of one group
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use docnav_site::{
    DEFAULT_TTL, Docs, DocsConfig, ExpandState, ExpandStateStore, FileExpandStore,
    MemoryExpandStore,
};
use docnav_storage::{ContentStore, FsStore};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation source directory.
    pub source_dir: PathBuf,
    /// Metadata file name (default: "meta.yaml").
    pub meta_filename: String,
    /// Route prefix of document hrefs.
    pub route_prefix: String,
    /// Time-to-live of the cached navigation structure.
    pub cache_ttl: Duration,
    /// Watch the source directory and rebuild on change.
    pub watch: bool,
    /// Sidebar expand state file (`None` keeps state in memory).
    pub state_file: Option<PathBuf>,
    /// Application version (for `ETag` computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            meta_filename: "meta.yaml".to_owned(),
            route_prefix: "/docs".to_owned(),
            cache_ttl: DEFAULT_TTL,
            watch: false,
            state_file: None,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the expand state cannot be loaded or the server fails
/// to bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::with_meta_filename(config.source_dir.clone(), &config.meta_filename);

    // Dropping the handle stops the watcher, so it lives until shutdown
    let _watch = if config.watch {
        match store.watch() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "File watching disabled");
                None
            }
        }
    } else {
        None
    };

    let store: Arc<dyn ContentStore> = Arc::new(store);
    let docs = Arc::new(Docs::new(
        store,
        DocsConfig {
            route_prefix: config.route_prefix.clone(),
            cache_ttl: config.cache_ttl,
        },
    ));

    let expand_store: Box<dyn ExpandStateStore> = match &config.state_file {
        Some(path) => Box::new(FileExpandStore::new(path.clone())),
        None => Box::new(MemoryExpandStore::new()),
    };
    let expand_state = ExpandState::load(expand_store)?;

    let state = Arc::new(AppState {
        docs,
        expand_state,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from docnav config.
#[must_use]
pub fn server_config_from_config(config: &docnav_config::Config, version: String) -> ServerConfig {
    let docs = &config.docs_resolved;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: docs.source_dir.clone(),
        meta_filename: config.metadata.name.clone(),
        route_prefix: docs.route_prefix.clone(),
        cache_ttl: docs.cache_ttl(),
        watch: docs.watch,
        state_file: Some(docs.state_file()),
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let config = docnav_config::Config::default();

        let server = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 7979);
        assert_eq!(server.route_prefix, "/docs");
        assert_eq!(server.cache_ttl, Duration::from_secs(300));
        assert_eq!(server.meta_filename, "meta.yaml");
        assert_eq!(server.state_file, Some(config.docs_resolved.state_file()));
        assert_eq!(server.version, "1.2.3");
    }
}
