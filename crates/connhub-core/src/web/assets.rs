//! Static file serving using rust-embed.
//!
//! This module embeds the web UI assets (HTML, JS, CSS) directly into the binary
//! at compile time, eliminating the need for a separate static file server.

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded static assets for the web UI.
#[derive(RustEmbed)]
#[folder = "src/web/assets/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.ico"]
#[include = "*.svg"]
pub struct Assets;

/// Serve a static file as a fallback handler.
///
/// Used for any path that doesn't match an API route; `/` maps to
/// `index.html`.
pub async fn serve_static_fallback(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    serve_file(path)
}

fn serve_file(path: &str) -> Response {
    Assets::get(path).map_or_else(
        || (StatusCode::NOT_FOUND, "Not Found").into_response(),
        |content| {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache_control_for(path).to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response()
        },
    )
}

/// Get the appropriate Cache-Control header value for a path.
fn cache_control_for(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    }
}
