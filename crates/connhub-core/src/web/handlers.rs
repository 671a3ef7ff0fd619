//! HTTP endpoint handlers for the ConnHub web interface.
//!
//! This module contains all the handler functions for the REST API endpoints.

#![allow(clippy::missing_errors_doc)]

use std::io;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::io::StreamReader;

use crate::error::Error;
use crate::sync::PollResult;

use super::error::{ApiError, ApiResult};
use super::state::SharedState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

// ============================================================================
// Request / response types
// ============================================================================

/// Query parameters for `GET /api/state`.
///
/// Kept as raw strings so that absent or unparsable values fall back to 0
/// instead of rejecting the poll.
#[derive(Debug, Default, Deserialize)]
pub struct StateQuery {
    /// Last text timestamp the client saw
    text_ts: Option<String>,
    /// Last file list timestamp the client saw
    files_ts: Option<String>,
}

impl StateQuery {
    fn timestamps(&self) -> (i64, i64) {
        (parse_ts(self.text_ts.as_deref()), parse_ts(self.files_ts.as_deref()))
    }
}

fn parse_ts(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Text update response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    /// Timestamp assigned to the new text
    pub ts: i64,
}

// ============================================================================
// Sync handlers
// ============================================================================

/// GET /api/state - Report what changed since the client's timestamps.
pub async fn get_state(
    State(state): State<SharedState>,
    Query(query): Query<StateQuery>,
) -> Json<PollResult> {
    let (text_ts, files_ts) = query.timestamps();
    Json(state.sync.poll(text_ts, files_ts).await)
}

/// POST /api/text - Replace the shared text with the request body.
pub async fn set_text(State(state): State<SharedState>, body: String) -> Json<TextResponse> {
    let ts = state.sync.set_text(body).await;
    Json(TextResponse { ts })
}

// ============================================================================
// File handlers
// ============================================================================

/// POST /api/files/upload - Store the multipart `file` field.
pub async fn upload_file(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<StatusCode> {
    let limit = state.config.storage.max_upload_size;
    if content_length(&headers).is_some_and(|len| len > limit) {
        return Err(ApiError::payload_too_large(format!(
            "Upload exceeds the {limit} byte limit"
        )));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, "Failed to read multipart field"))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(String::from)
            .ok_or_else(|| ApiError::bad_request("Upload is missing a file name"))?;

        let reader = StreamReader::new(field.map_err(io::Error::other));
        state
            .store
            .upload(&name, reader)
            .await
            .map_err(|e| upload_error(e, &name))?;

        return Ok(StatusCode::OK);
    }

    Err(ApiError::bad_request(format!(
        "Missing '{UPLOAD_FIELD}' field"
    )))
}

/// GET /api/files/download/{name} - Stream a stored file.
pub async fn download_file(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let download = state.store.download(&name).await.map_err(|e| match e {
        Error::FileNotFound(_) => ApiError::not_found("File not found"),
        other => ApiError::from(other),
    })?;

    let disposition = content_disposition(download.name());
    let body = Body::from_stream(download.into_stream());

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// DELETE /api/files/delete/{name} - Remove a stored file.
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete(&name).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Helpers
// ============================================================================

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// `attachment` disposition carrying an ASCII fallback in `filename` and the
/// exact logical name in the RFC 6266 `filename*` form.
fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();
    let encoded = urlencoding::encode(name);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

fn multipart_error(err: &MultipartError, context: &str) -> ApiError {
    let status = err.status();
    let message = format!("{context}: {}", err.body_text());
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(message)
    } else {
        ApiError::bad_request(message)
    }
}

/// Client-side stream failures surface as I/O errors wrapping the multipart
/// error; report those with the multipart status instead of a 500.
fn upload_error(err: Error, name: &str) -> ApiError {
    if let Error::Io(io_err) = &err {
        if let Some(multipart) = io_err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
        {
            return multipart_error(multipart, &format!("Failed to receive '{name}'"));
        }
    }
    ApiError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ts() {
        assert_eq!(parse_ts(None), 0);
        assert_eq!(parse_ts(Some("")), 0);
        assert_eq!(parse_ts(Some("abc")), 0);
        assert_eq!(parse_ts(Some("12.5")), 0);
        assert_eq!(parse_ts(Some("1700000000000")), 1_700_000_000_000);
        assert_eq!(parse_ts(Some("-5")), -5);
    }

    #[test]
    fn test_state_query_timestamps() {
        let query = StateQuery {
            text_ts: Some("10".into()),
            files_ts: Some("nope".into()),
        };
        assert_eq!(query.timestamps(), (10, 0));
        assert_eq!(StateQuery::default().timestamps(), (0, 0));
    }

    #[test]
    fn test_content_disposition_encodes_name() {
        assert_eq!(
            content_disposition("report.pdf"),
            "attachment; filename=\"report.pdf\"; filename*=UTF-8''report.pdf"
        );
        assert_eq!(
            content_disposition("a b/c.txt"),
            "attachment; filename=\"a b_c.txt\"; filename*=UTF-8''a%20b%2Fc.txt"
        );
        assert_eq!(
            content_disposition("사진 \"1\".png"),
            "attachment; filename=\"__ _1_.png\"; \
             filename*=UTF-8''%EC%82%AC%EC%A7%84%20%221%22.png"
        );
    }

    #[test]
    fn test_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, "1024".parse().unwrap());
        assert_eq!(content_length(&headers), Some(1024));
    }

    #[test]
    fn test_upload_error_keeps_core_status() {
        let err = upload_error(Error::InvalidFileName("empty".into()), "x");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = upload_error(Error::Io(io::Error::other("disk full")), "x");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
