//! Capability seams around the external tools.
//!
//! The archive container, the compression codec, and the interactive picker
//! are all delegated to subprocesses (`tar`, `pigz`, `fzf`). These traits
//! keep the backup and restore logic testable without spawning any of them.

pub mod archiver;
pub mod chooser;

pub use archiver::PigzTarArchiver;
pub use chooser::FzfChooser;

use crate::utils::{BackupError, Result};
use std::path::Path;
use std::process::Stdio;
use tracing::debug;

/// Incremental archive creation and extraction.
#[allow(async_fn_in_trait)]
pub trait Archiver {
    /// Create `archive` from `source`, updating the incremental state held
    /// in `snar`.
    async fn create(&self, archive: &Path, snar: &Path, source: &Path) -> Result<()>;

    /// Extract `archive` into `dest`.
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Interactive single-line selection.
#[allow(async_fn_in_trait)]
pub trait Chooser {
    /// Present `candidates` and return the chosen line, or `None` when the
    /// user cancelled without selecting.
    async fn select(&self, candidates: &[String]) -> Result<Option<String>>;
}

/// Binaries this tool shells out to.
pub const REQUIRED_TOOLS: [&str; 3] = ["tar", "pigz", "fzf"];

/// Verify every required external binary is reachable on PATH.
pub async fn preflight() -> Result<()> {
    for tool in REQUIRED_TOOLS {
        let status = tokio::process::Command::new("which")
            .arg(tool)
            .stdout(Stdio::null())
            .status()
            .await?;
        if !status.success() {
            return Err(BackupError::ToolMissing(tool));
        }
        debug!("found {tool}");
    }
    Ok(())
}
