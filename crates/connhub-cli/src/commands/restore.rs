//! Restore command implementation.

use anyhow::{Context, Result};

use connhub_core::store::restore_dir;

use super::RestoreArgs;

/// Run the restore command.
pub async fn run(args: RestoreArgs) -> Result<()> {
    let report = restore_dir(&args.dir)
        .await
        .with_context(|| format!("Failed to restore {}", args.dir.display()))?;

    for (physical, logical) in &report.restored {
        println!("  {physical} -> {logical}");
    }
    for (entry, reason) in &report.skipped {
        println!("  skipped {entry}: {reason}");
    }

    println!();
    println!(
        "Restored {} file(s), skipped {}.",
        report.restored.len(),
        report.skipped.len()
    );

    Ok(())
}
