//! Poll protocol over the shared text and file list.
//!
//! Clients remember the timestamp of the last text and file list they saw and
//! send both with every poll. A field is retransmitted in full only when its
//! timestamp moved past the client's; otherwise the response just says
//! `updated: false`. A client sending `0` for both always gets everything.
//!
//! The two fields are checked independently, each under its own read lock, so
//! one response may show the text and the file list as of different instants.

use std::sync::Arc;

use serde::Serialize;

use crate::store::FileList;
use crate::versioned::{Snapshot, Versioned};

/// Per-field poll answer.
///
/// Serializes as `{"updated": false}` or
/// `{"updated": true, "data": ..., "ts": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate<T> {
    /// Whether the field changed since the client's timestamp
    pub updated: bool,
    /// Full current value, present only when updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Timestamp of the current value, present only when updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl<T> FieldUpdate<T> {
    /// A field the client already has.
    pub const fn unchanged() -> Self {
        Self {
            updated: false,
            data: None,
            ts: None,
        }
    }
}

impl<T> From<Option<Snapshot<T>>> for FieldUpdate<T> {
    fn from(snapshot: Option<Snapshot<T>>) -> Self {
        snapshot.map_or_else(Self::unchanged, |s| Self {
            updated: true,
            data: Some(s.value),
            ts: Some(s.updated_at),
        })
    }
}

/// Answer to a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollResult {
    /// Shared text
    pub text: FieldUpdate<String>,
    /// Shared file list
    pub files: FieldUpdate<Vec<String>>,
}

/// Owns the shared text and reconciles client timestamps against current state.
#[derive(Debug)]
pub struct SyncCoordinator {
    text: Versioned<String>,
    files: Arc<FileList>,
}

impl SyncCoordinator {
    /// Create a coordinator with empty text, sharing `files` with the
    /// [`FileStore`](crate::store::FileStore).
    pub fn new(files: Arc<FileList>) -> Self {
        Self {
            text: Versioned::new(String::new()),
            files,
        }
    }

    /// Report which fields changed after the client's timestamps.
    pub async fn poll(&self, client_text_ts: i64, client_files_ts: i64) -> PollResult {
        let text = self.text.read_since(client_text_ts).await.into();
        let files = self.files.read_since(client_files_ts).await.into();
        PollResult { text, files }
    }

    /// Replace the shared text and return its new timestamp.
    pub async fn set_text(&self, text: String) -> i64 {
        let len = text.len();
        let ts = self.text.write(text).await;
        tracing::debug!("Shared text set ({} bytes) at {}", len, ts);
        ts
    }

    /// Current text and its timestamp.
    pub async fn text(&self) -> Snapshot<String> {
        self.text.read().await
    }
}
