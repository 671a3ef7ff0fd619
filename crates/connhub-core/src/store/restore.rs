//! Recover logical filenames in a staging directory.
//!
//! If the server dies without cleaning up, the staging directory is left full
//! of hex names. [`restore_dir`] renames each of them back in place.

use std::path::Path;

use super::naming::decode_name;
use crate::error::Result;

/// Outcome of a [`restore_dir`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// `(physical, logical)` pairs that were renamed
    pub restored: Vec<(String, String)>,
    /// `(entry, reason)` pairs that were left alone
    pub skipped: Vec<(String, String)>,
}

/// Rename every hex-named file in `dir` to its decoded logical name.
///
/// Directories, names that are not hex-encoded UTF-8, names that would leave
/// `dir` once decoded, and names whose target already exists are skipped and
/// reported rather than failing the whole run.
///
/// # Errors
///
/// Returns an error only if `dir` itself cannot be read.
pub async fn restore_dir(dir: &Path) -> Result<RestoreReport> {
    let mut report = RestoreReport::default();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let physical = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type().await?.is_dir() {
            report.skipped.push((physical, "directory".into()));
            continue;
        }

        let logical = match decode_name(&physical) {
            Ok(name) => name,
            Err(e) => {
                report.skipped.push((physical, e.to_string()));
                continue;
            }
        };

        if !is_plain_component(&logical) {
            report
                .skipped
                .push((physical, format!("unsafe name '{logical}'")));
            continue;
        }

        let target = dir.join(&logical);
        if tokio::fs::try_exists(&target).await? {
            report
                .skipped
                .push((physical, format!("'{logical}' already exists")));
            continue;
        }

        match tokio::fs::rename(entry.path(), &target).await {
            Ok(()) => {
                tracing::debug!("Restored {} -> {}", physical, logical);
                report.restored.push((physical, logical));
            }
            Err(e) => report.skipped.push((physical, e.to_string())),
        }
    }

    report.restored.sort();
    report.skipped.sort();
    Ok(report)
}

fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
