//! # ConnHub Core Library
//!
//! `connhub-core` provides the state-synchronization and file-transfer engine
//! behind ConnHub, a single-process service that shares one text buffer and a
//! set of uploaded files with every browser on the local network.
//!
//! ## Features
//!
//! - **Timestamp-gated polling**: clients send the last timestamps they saw and
//!   only receive the fields that changed since
//! - **Streaming transfers**: uploads and downloads never buffer whole files
//! - **Safe on-disk naming**: client filenames are hex-encoded before touching
//!   the filesystem
//! - **Ephemeral storage**: the staging directory lives as long as the process
//!
//! ## Modules
//!
//! - [`config`] - Configuration management
//! - [`net`] - Local address discovery and port probing
//! - [`store`] - Staging directory, filename encoding and file transfers
//! - [`sync`] - Poll protocol over the shared text and file list
//! - [`versioned`] - Value + timestamp + lock building block
//! - [`web`] - HTTP routes for the browser UI and API
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use connhub_core::{store::FileStore, sync::SyncCoordinator, versioned::Versioned};
//!
//! let files = Arc::new(Versioned::new(Vec::new()));
//! let store = FileStore::open(&config.storage, Arc::clone(&files))?;
//! let sync = SyncCoordinator::new(files);
//!
//! let ts = sync.set_text("hello".into()).await;
//! let poll = sync.poll(0, 0).await;
//! assert_eq!(poll.text.data.as_deref(), Some("hello"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod net;
pub mod store;
pub mod sync;
pub mod versioned;

#[cfg(feature = "web")]
pub mod web;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default maximum upload size (10 GiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024 * 1024;

/// Default maximum shared text size (16 MiB)
pub const DEFAULT_MAX_TEXT_SIZE: usize = 16 * 1024 * 1024;

/// Default write buffer for uploads (1 MiB)
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 1024 * 1024;

/// Default chunk size for streamed downloads (64 KiB)
pub const DEFAULT_DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;
