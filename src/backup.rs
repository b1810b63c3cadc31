//! The `backup` operation: one incremental snapshot per run.

use crate::context::Context;
use crate::external::Archiver;
use crate::journal::Journal;
use crate::utils::Result;

/// Create this run's incremental archive under `snapshots/`.
///
/// The archive name carries the timestamp captured at process start, so two
/// separate runs always produce distinct, chronologically ordered files.
pub async fn run<A: Archiver>(ctx: &Context, journal: &Journal, archiver: &A) -> Result<()> {
    let archive = ctx.archive_path();

    journal.info(&format!(
        "Creating incremental backup: {}",
        archive.display()
    ))?;
    archiver
        .create(&archive, &ctx.snar_path, &ctx.source_dir)
        .await?;
    journal.info(&format!("Backup completed: {}", archive.display()))?;

    Ok(())
}
