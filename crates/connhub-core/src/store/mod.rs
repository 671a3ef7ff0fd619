//! Staging directory and file transfers.
//!
//! The [`FileStore`] exclusively owns one flat directory. Every uploaded file
//! lives there under its hex-encoded name (see [`naming`]); the list of
//! logical names clients see is a [`Versioned`] value shared with the
//! [`SyncCoordinator`](crate::sync::SyncCoordinator).
//!
//! ## Consistency
//!
//! - Uploads hold the file-list write lock for the whole transfer, so they are
//!   serialized and the list is only touched once the bytes are on disk.
//! - New content is written to a staging file first and renamed over the
//!   previous copy once complete, so readers see either the old or the new
//!   file.
//! - Opening refuses a directory holding entries the store did not write.
//! - Downloads do not lock the list. A delete racing a download either lets
//!   the already opened file finish streaming or turns the download into a
//!   not-found error.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};
use tokio_util::io::ReaderStream;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::versioned::{Snapshot, Versioned};

pub mod naming;
mod restore;

pub use naming::{decode_name, encode_name, MAX_NAME_BYTES};
pub use restore::{restore_dir, RestoreReport};

/// Shared, versioned list of logical filenames, most recently affected last.
pub type FileList = Versioned<Vec<String>>;

/// Staging name for in-flight uploads; never valid hex, so it cannot collide
/// with a stored file.
const STAGING_NAME: &str = "upload.part";

/// Streams uploaded files into a private directory and back out again.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    files: Arc<FileList>,
    upload_buffer_size: usize,
    download_chunk_size: usize,
}

impl FileStore {
    /// Prepare the staging directory and take ownership of it.
    ///
    /// Stale uploads from a previous run are removed: storage does not
    /// survive restarts. An existing directory holding anything other than
    /// hex-named files or a partial upload is left untouched and reported as
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the directory holds foreign
    /// entries or cannot be cleared or created.
    pub fn open(config: &StorageConfig, files: Arc<FileList>) -> Result<Self> {
        let root = config.temp_dir.clone();
        let unavailable = |reason: String| Error::StorageUnavailable {
            path: root.display().to_string(),
            reason,
        };

        match std::fs::read_dir(&root) {
            Ok(entries) => {
                let mut stale = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|e| unavailable(format!("failed to read: {e}")))?;
                    let is_file = entry.file_type().is_ok_and(|t| t.is_file());
                    match entry.file_name().to_str() {
                        Some(name) if is_file && is_owned_name(name) => stale.push(entry.path()),
                        _ => {
                            return Err(unavailable(format!(
                                "refusing to clear '{}': not created by ConnHub",
                                entry.file_name().to_string_lossy()
                            )))
                        }
                    }
                }
                for path in &stale {
                    std::fs::remove_file(path)
                        .map_err(|e| unavailable(format!("failed to clear: {e}")))?;
                }
                if !stale.is_empty() {
                    tracing::debug!("Cleared {} stale file(s) in {}", stale.len(), root.display());
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(unavailable(format!("failed to read: {e}"))),
        }
        std::fs::create_dir_all(&root).map_err(|e| unavailable(format!("failed to create: {e}")))?;

        tracing::info!("Staging directory ready at {}", root.display());

        Ok(Self {
            root,
            files,
            upload_buffer_size: config.upload_buffer_size.max(1),
            download_chunk_size: config.download_chunk_size.max(1),
        })
    }

    /// The staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The shared file list.
    pub fn files(&self) -> &Arc<FileList> {
        &self.files
    }

    /// Current file list and its timestamp.
    pub async fn list(&self) -> Snapshot<Vec<String>> {
        self.files.read().await
    }

    /// On-disk location of a logical filename.
    pub fn physical_path(&self, logical: &str) -> Result<PathBuf> {
        Ok(self.root.join(encode_name(logical)?))
    }

    /// Store `reader`'s content under `name`, replacing any previous file.
    ///
    /// Returns the number of bytes written. On success `name` moves to the end
    /// of the file list and the list timestamp advances; on failure neither
    /// the list nor the previous file is touched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFileName`] if `name` cannot be encoded
    /// - [`Error::Io`] if reading the content or writing it to disk fails
    /// - [`Error::ReplaceFailed`] if the previous copy cannot be replaced
    pub async fn upload<R>(&self, name: &str, reader: R) -> Result<u64>
    where
        R: AsyncRead,
    {
        let physical = self.physical_path(name)?;
        let staging = self.root.join(STAGING_NAME);
        tokio::pin!(reader);

        let mut files = self.files.lock().await;

        let written = match self.write_staging(&staging, &mut reader).await {
            Ok(written) => written,
            Err(e) => {
                discard(&staging).await;
                tracing::error!("Upload of '{}' failed: {}", name, e);
                return Err(e.into());
            }
        };

        if let Err(e) = Self::replace(&staging, &physical, name).await {
            discard(&staging).await;
            // A previous copy that is gone can no longer be advertised.
            let gone = !tokio::fs::try_exists(&physical).await.unwrap_or(true);
            if gone && files.value().iter().any(|n| n == name) {
                files.modify(|list| list.retain(|n| n != name));
            }
            return Err(e);
        }

        files.modify(|list| {
            list.retain(|n| n != name);
            list.push(name.to_string());
        });

        tracing::info!("Stored '{}' ({} bytes)", name, written);
        Ok(written)
    }

    /// Open a stored file for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if nothing is stored under `name`.
    pub async fn download(&self, name: &str) -> Result<Download> {
        // A name that cannot be encoded was never stored.
        let physical = self.physical_path(name).map_err(|e| match e {
            Error::InvalidFileName(_) => Error::FileNotFound(name.to_string()),
            other => other,
        })?;

        let file = File::open(&physical).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(name.to_string()),
            _ => Error::Io(e),
        })?;
        let size = file.metadata().await?.len();

        tracing::debug!("Serving '{}' ({} bytes)", name, size);

        Ok(Download {
            name: name.to_string(),
            size,
            file,
            chunk_size: self.download_chunk_size,
        })
    }

    /// Remove `name` from disk and from the file list.
    ///
    /// Deleting a name that does not exist is not an error. The list
    /// timestamp advances on every call, so clients treat each delete as a
    /// synchronization point. Returns the new list timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the stored file exists but cannot be removed;
    /// the list is left unchanged in that case.
    pub async fn delete(&self, name: &str) -> Result<i64> {
        let mut files = self.files.lock().await;

        // A name that cannot be encoded was never stored.
        let Ok(physical) = self.physical_path(name) else {
            tracing::debug!("Delete of unstorable name '{}'", name);
            return Ok(files.touch());
        };
        remove_if_exists(&physical).await?;
        let ts = files.modify(|list| list.retain(|n| n != name));

        tracing::info!("Deleted '{}'", name);
        Ok(ts)
    }

    /// Remove the stored files and the staging directory.
    ///
    /// Best effort: handlers still streaming may lose their files. Entries
    /// the store did not create are left in place along with the directory.
    pub async fn shutdown(&self) {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!("Failed to read staging directory {}: {}", self.root.display(), e);
                return;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let owned = entry
                .file_name()
                .to_str()
                .is_some_and(is_owned_name);
            if owned {
                discard(&entry.path()).await;
            }
        }

        match tokio::fs::remove_dir(&self.root).await {
            Ok(()) => tracing::info!("Removed staging directory {}", self.root.display()),
            Err(e) => tracing::warn!(
                "Failed to remove staging directory {}: {}",
                self.root.display(),
                e
            ),
        }
    }

    /// Move the finished staging file onto `physical`.
    ///
    /// `rename` replaces an existing file in one step. Only when something
    /// that cannot be renamed over (such as a directory) holds the name is
    /// it removed first.
    async fn replace(staging: &Path, physical: &Path, name: &str) -> Result<()> {
        let Err(first) = tokio::fs::rename(staging, physical).await else {
            return Ok(());
        };
        if tokio::fs::symlink_metadata(physical).await.is_err() {
            return Err(first.into());
        }

        remove_dir_or_file(physical)
            .await
            .map_err(|source| Error::ReplaceFailed {
                name: name.to_string(),
                source,
            })?;
        tokio::fs::rename(staging, physical).await.map_err(Into::into)
    }

    async fn write_staging<R>(&self, staging: &Path, reader: &mut R) -> io::Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let file = File::create(staging).await?;
        let mut writer = BufWriter::with_capacity(self.upload_buffer_size, file);
        let written = tokio::io::copy(reader, &mut writer).await?;
        writer.flush().await?;
        Ok(written)
    }
}

/// An opened stored file, ready to be streamed to a client.
#[derive(Debug)]
pub struct Download {
    name: String,
    size: u64,
    file: File,
    chunk_size: usize,
}

impl Download {
    /// Logical filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes at open time.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Stream the content in fixed-size chunks.
    pub fn into_stream(self) -> ReaderStream<File> {
        ReaderStream::with_capacity(self.file, self.chunk_size)
    }
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Empty directories squatting on a physical name are removed too; anything
/// else that is not a file is reported.
async fn remove_dir_or_file(path: &Path) -> io::Result<()> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir(path).await,
        Ok(_) => remove_if_exists(path).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Whether a staging directory entry is one the store writes itself.
fn is_owned_name(name: &str) -> bool {
    name == STAGING_NAME || decode_name(name).is_ok()
}

async fn discard(path: &Path) {
    if let Err(e) = remove_if_exists(path).await {
        tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
    }
}
