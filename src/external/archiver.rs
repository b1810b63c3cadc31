//! Process-backed archiver: `tar` compressing through `pigz`.

use super::Archiver;
use crate::utils::{BackupError, Result};
use std::path::Path;
use tokio::process::Command;

/// Compression program handed to `tar`. The `-k` flag keeps pigz's input
/// files in place.
const COMPRESS_PROGRAM: &str = "pigz -k";

/// Runs `tar` with `--listed-incremental` state tracking. stdout/stderr are
/// inherited, so the verbose file listing streams to the console while the
/// subprocess runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PigzTarArchiver;

impl Archiver for PigzTarArchiver {
    async fn create(&self, archive: &Path, snar: &Path, source: &Path) -> Result<()> {
        let status = Command::new("tar")
            .arg(format!("--use-compress-program={COMPRESS_PROGRAM}"))
            .arg("--verbose")
            .arg("--create")
            .arg(format!("--file={}", archive.display()))
            .arg(format!("--listed-incremental={}", snar.display()))
            .arg(source)
            .status()
            .await?;
        if !status.success() {
            return Err(BackupError::BackupSubprocessFailed {
                archive: archive.to_path_buf(),
                status,
            });
        }
        Ok(())
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let status = Command::new("tar")
            .arg(format!("--use-compress-program={COMPRESS_PROGRAM}"))
            .arg("--verbose")
            .arg("--extract")
            .arg(format!("--file={}", archive.display()))
            .arg("-C")
            .arg(dest)
            .status()
            .await?;
        if !status.success() {
            return Err(BackupError::RestoreSubprocessFailed {
                archive: archive.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}
