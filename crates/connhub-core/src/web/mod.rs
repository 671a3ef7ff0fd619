//! Embedded web server for ConnHub.
//!
//! The server needs **zero external infrastructure**: the binary serves the
//! browser UI and the JSON API from the same port.
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | / | Web UI |
//! | GET | /api/state?text_ts=&files_ts= | Poll for changes |
//! | POST | /api/text | Replace the shared text (raw body) |
//! | POST | /api/files/upload | Upload the multipart `file` field |
//! | GET | /api/files/download/{name} | Stream a file |
//! | DELETE | /api/files/delete/{name} | Delete a file |
//!
//! Any other method on these paths is answered with 405.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;

pub mod assets;
pub mod error;
pub mod handlers;
pub mod state;

pub use state::{AppState, SharedState};

/// Build the route table.
pub fn router(state: SharedState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size).unwrap_or(usize::MAX);
    let max_text = state.config.storage.max_text_size;

    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route(
            "/api/text",
            post(handlers::set_text).layer(DefaultBodyLimit::max(max_text)),
        )
        .route(
            "/api/files/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/api/files/download/{name}", get(handlers::download_file))
        .route("/api/files/delete/{name}", delete(handlers::delete_file))
        .fallback(assets::serve_static_fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The web server instance.
#[derive(Debug)]
pub struct WebServer {
    listener: TcpListener,
    state: SharedState,
}

impl WebServer {
    /// Bind the listening port, then prepare the staging directory.
    ///
    /// The port is claimed first so that a second instance fails before it
    /// can wipe the staging directory of the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortInUse`](crate::Error::PortInUse) if the port is
    /// taken, or a storage error if the staging directory cannot be prepared.
    pub async fn bind(config: Config) -> Result<Self> {
        let listener = crate::net::bind(config.server.bind_addr()).await?;
        let state = Arc::new(AppState::new(config)?);

        Ok(Self { listener, state })
    }

    /// The shared application state.
    pub const fn state(&self) -> &SharedState {
        &self.state
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// URLs other devices can use to reach the server.
    pub fn addresses(&self) -> Result<Vec<String>> {
        Ok(crate::net::reachable_urls(self.local_addr()?))
    }

    /// Serve requests until `shutdown` resolves, then remove the staging
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while accepting connections.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self { listener, state } = self;

        tracing::info!("Server initialized");
        let served = axum::serve(listener, router(Arc::clone(&state)))
            .with_graceful_shutdown(shutdown)
            .await;

        state.store.shutdown().await;
        tracing::info!("Server stopped");

        served.map_err(Into::into)
    }
}
