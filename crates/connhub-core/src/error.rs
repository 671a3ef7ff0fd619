//! Error types for ConnHub.
//!
//! This module provides a unified error type for all ConnHub operations,
//! with specific error variants for different failure modes.

use std::io;

use thiserror::Error;

/// A specialized `Result` type for ConnHub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for ConnHub.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested file is not in the staging directory (E001)
    #[error("file '{0}' not found")]
    FileNotFound(String),

    /// Logical filename cannot be stored (E002)
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// Previous copy of a file could not be removed before replacing it (E003)
    #[error("unable to replace existing file '{name}': {source}")]
    ReplaceFailed {
        /// Logical name of the file being replaced
        name: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Staging directory could not be prepared (E004)
    #[error("storage unavailable at {path}: {reason}")]
    StorageUnavailable {
        /// Staging directory path
        path: String,
        /// Reason for failure
        reason: String,
    },

    /// Port already bound by another process (E005)
    #[error("port {0} is already in use")]
    PortInUse(u16),

    /// Physical name is not a valid hex encoding of a UTF-8 name
    #[error("cannot decode stored name '{0}'")]
    UndecodableName(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns the error code associated with this error, if any.
    ///
    /// Error codes follow the pattern EXXX where XXX is a 3-digit number.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::FileNotFound(_) => Some("E001"),
            Self::InvalidFileName(_) => Some("E002"),
            Self::ReplaceFailed { .. } => Some("E003"),
            Self::StorageUnavailable { .. } => Some("E004"),
            Self::PortInUse(_) => Some("E005"),
            _ => None,
        }
    }

    /// Returns a helpful suggestion for resolving the error, if applicable.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::PortInUse(_) => Some(
                "Another program is listening on this port. Pick a different one:\n\
                   connhub serve 8001",
            ),
            Self::StorageUnavailable { .. } => Some(
                "Check that the staging directory is writable, or choose another:\n\
                   connhub serve --temp-dir /path/to/dir",
            ),
            Self::ConfigError(_) => Some(
                "Inspect the configuration file or restore defaults:\n\
                   connhub config reset",
            ),
            _ => None,
        }
    }
}
