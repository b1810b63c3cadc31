//! Immutable per-run context: validated directories, the derived backup
//! layout, and the timestamp that names this run's archive.
//!
//! Built once at startup from the loaded [`Config`]; nothing below this
//! layer reads ambient environment state.

use crate::config::Config;
use crate::utils::{BackupError, Result};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

pub const SNAPSHOTS_DIR: &str = "snapshots";
pub const RESTORE_DIR: &str = "restore";
pub const SNAR_FILE: &str = "backup.snar";
pub const JOURNAL_FILE: &str = "_backup.log";
pub const ERROR_JOURNAL_FILE: &str = "_error.log";

#[derive(Debug, Clone)]
pub struct Context {
    pub source_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub snapshots_dir: PathBuf,
    /// Wiped and recreated by each restore run; never pre-created here.
    pub restore_dir: PathBuf,
    /// Incremental state handed to the archiver. Opaque to this tool.
    pub snar_path: PathBuf,
    pub journal_path: PathBuf,
    pub error_journal_path: PathBuf,
    /// Unix timestamp captured once at startup.
    pub timestamp: u64,
}

impl Context {
    /// Validate the configured directories and set up the backup layout.
    ///
    /// `SOURCE_DIR` must already exist as a directory. `BACKUP_DIR` and its
    /// `snapshots/` subdirectory are created if absent, parents included.
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::bootstrap_at(config, timestamp)
    }

    fn bootstrap_at(config: &Config, timestamp: u64) -> Result<Self> {
        let source_dir = config.source_dir.clone();
        if !source_dir.is_dir() {
            return Err(BackupError::SourceNotDirectory(source_dir));
        }

        let backup_dir = config.backup_dir.clone();
        if backup_dir.exists() {
            if !backup_dir.is_dir() {
                return Err(BackupError::BackupPathConflict(backup_dir));
            }
        } else {
            debug!("creating backup root {}", backup_dir.display());
            fs::create_dir_all(&backup_dir)?;
        }

        let snapshots_dir = backup_dir.join(SNAPSHOTS_DIR);
        fs::create_dir_all(&snapshots_dir)?;

        Ok(Self {
            source_dir,
            restore_dir: backup_dir.join(RESTORE_DIR),
            snar_path: backup_dir.join(SNAR_FILE),
            journal_path: backup_dir.join(JOURNAL_FILE),
            error_journal_path: backup_dir.join(ERROR_JOURNAL_FILE),
            snapshots_dir,
            backup_dir,
            timestamp,
        })
    }

    /// Path of the snapshot archive this run would create.
    pub fn archive_path(&self) -> PathBuf {
        self.snapshots_dir
            .join(format!("backup_{}.tar.gz", self.timestamp))
    }
}
