//! Configuration management for ConnHub.
//!
//! This module handles loading, saving, and managing ConnHub configuration.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/connhub/config.toml` |
//! | macOS | `~/Library/Application Support/ConnHub/config.toml` |
//! | Windows | `%APPDATA%\ConnHub\config.toml` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use connhub_core::config::Config;
//!
//! let config = Config::load()?;
//! println!("Port: {}", config.server.port);
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration struct for ConnHub.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Staging storage settings
    pub storage: StorageConfig,
}

/// HTTP server configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind to localhost only
    pub localhost_only: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            localhost_only: false,
        }
    }
}

impl ServerConfig {
    /// Get the bind address for the server.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        if self.localhost_only {
            SocketAddr::from(([127, 0, 0, 1], self.port))
        } else {
            SocketAddr::from(([0, 0, 0, 0], self.port))
        }
    }
}

/// Staging storage configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding uploaded files; wiped at startup, removed at shutdown
    pub temp_dir: PathBuf,
    /// Largest accepted upload body in bytes
    pub max_upload_size: u64,
    /// Largest accepted shared text body in bytes
    pub max_text_size: usize,
    /// Write buffer used while streaming uploads to disk
    pub upload_buffer_size: usize,
    /// Chunk size for streamed downloads
    pub download_chunk_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("connhub"),
            max_upload_size: crate::DEFAULT_MAX_UPLOAD_SIZE,
            max_text_size: crate::DEFAULT_MAX_TEXT_SIZE,
            upload_buffer_size: crate::DEFAULT_UPLOAD_BUFFER_SIZE,
            download_chunk_size: crate::DEFAULT_DOWNLOAD_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| crate::error::Error::ConfigError(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| crate::error::Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to the default location.
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                crate::error::Error::ConfigError(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = self.to_toml()?;

        std::fs::write(&path, content)
            .map_err(|e| crate::error::Error::ConfigError(format!("Failed to write config: {e}")))
    }

    /// Render the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            crate::error::Error::ConfigError(format!("Failed to serialize config: {e}"))
        })
    }

    /// Get the default configuration directory path.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "connhub", "ConnHub")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the full path to the configuration file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.port, 8000);
        assert!(!config.server.localhost_only);
        assert_eq!(config.storage.max_upload_size, 10 * 1024 * 1024 * 1024);
        assert!(config.storage.temp_dir.ends_with("connhub"));
    }

    #[test]
    fn test_bind_addr() {
        let mut server = ServerConfig::default();
        assert_eq!(server.bind_addr().to_string(), "0.0.0.0:8000");

        server.localhost_only = true;
        server.port = 9000;
        assert_eq!(server.bind_addr().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut original = Config::default();
        original.server.port = 12345;
        original.storage.temp_dir = temp_dir.path().join("staging");
        original.storage.download_chunk_size = 4096;

        std::fs::write(&config_path, original.to_toml().expect("serialize")).expect("write");

        let loaded_content = std::fs::read_to_string(&config_path).expect("read");
        let loaded: Config = toml::from_str(&loaded_content).expect("parse");

        assert_eq!(loaded.server.port, 12345);
        assert_eq!(loaded.storage.temp_dir, temp_dir.path().join("staging"));
        assert_eq!(loaded.storage.download_chunk_size, 4096);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = Config::default().to_toml().unwrap();

        assert!(toml_str.contains("[server]"), "Should have [server] section");
        assert!(
            toml_str.contains("[storage]"),
            "Should have [storage] section"
        );
    }

    #[test]
    fn test_config_deserialization_partial() {
        let partial_toml = r#"
[server]
port = 9999
"#;

        let config: Config = toml::from_str(partial_toml).expect("parse partial config");

        assert_eq!(config.server.port, 9999);
        assert_eq!(
            config.storage.upload_buffer_size,
            crate::DEFAULT_UPLOAD_BUFFER_SIZE
        );
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(
            path.ends_with("config.toml"),
            "Config path should end with config.toml"
        );
    }
}
