//! Application state shared by all HTTP handlers.
//!
//! There are no global singletons: the composition root builds one
//! [`AppState`] and every handler receives it through axum's `State`.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::store::FileStore;
use crate::sync::SyncCoordinator;
use crate::versioned::Versioned;

/// Shared application state for all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Shared text and poll protocol
    pub sync: SyncCoordinator,
    /// Uploaded files
    pub store: FileStore,
    /// Server configuration
    pub config: Config,
}

impl AppState {
    /// Build the state, preparing a fresh staging directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory cannot be prepared.
    pub fn new(config: Config) -> Result<Self> {
        let files = Arc::new(Versioned::new(Vec::new()));
        let store = FileStore::open(&config.storage, Arc::clone(&files))?;
        let sync = SyncCoordinator::new(files);

        Ok(Self {
            sync,
            store,
            config,
        })
    }
}

/// Type alias for shared state across handlers.
pub type SharedState = Arc<AppState>;
