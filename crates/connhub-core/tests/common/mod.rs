//! Common test utilities for `ConnHub` integration tests.
//!
//! This module provides shared functionality for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use connhub_core::config::Config;
use connhub_core::web::{self, AppState, SharedState};

/// Boundary used by [`multipart_request`].
pub const BOUNDARY: &str = "connhub-test-boundary";

/// A running in-process app with its own staging directory.
///
/// The staging directory is removed when the harness is dropped.
pub struct TestApp {
    pub state: SharedState,
    _dir: TempDir,
}

impl TestApp {
    /// Create an app with default configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create an app after adjusting the default configuration.
    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut config = Config::default();
        config.storage.temp_dir = dir.path().join("staging");
        adjust(&mut config);

        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        Self { state, _dir: dir }
    }

    /// Fresh router over the shared state.
    pub fn router(&self) -> Router {
        web::router(Arc::clone(&self.state))
    }

    /// Send one request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET /api/state` and parse the JSON body.
    pub async fn poll(&self, text_ts: i64, files_ts: i64) -> serde_json::Value {
        let response = self
            .send(get(&format!("/api/state?text_ts={text_ts}&files_ts={files_ts}")))
            .await;
        assert_eq!(response.status(), 200);
        body_json(response).await
    }

    /// Upload `content` as `name` and return the response status.
    pub async fn upload(&self, name: &str, content: &[u8]) -> u16 {
        self.send(multipart_request("file", Some(name), content))
            .await
            .status()
            .as_u16()
    }

    /// Current server-side file list timestamp.
    pub async fn files_ts(&self) -> i64 {
        self.state.store.list().await.updated_at
    }
}

/// Build a GET request.
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// Build a request with a raw body.
pub fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

/// Build the multipart body a browser form would send for one file.
pub fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = file_name.map_or_else(
        || format!("form-data; name=\"{field}\""),
        |name| format!("form-data; name=\"{field}\"; filename=\"{name}\""),
    );

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart upload request.
pub fn multipart_request(field: &str, file_name: Option<&str>, content: &[u8]) -> Request<Body> {
    let body = multipart_body(field, file_name, content);
    Request::post("/api/files/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Response is not JSON")
}

/// Generate random bytes for testing.
pub fn random_bytes(size: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut bytes = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
