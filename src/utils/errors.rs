//! Custom error types for the backup tool.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigInvalid(String),

    #[error("SOURCE_DIR is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("BACKUP_DIR exists but is not a directory: {}", .0.display())]
    BackupPathConflict(PathBuf),

    #[error("Required tool not found on PATH: {0}")]
    ToolMissing(&'static str),

    #[error("Archiver failed creating {} ({status})", .archive.display())]
    BackupSubprocessFailed {
        archive: PathBuf,
        status: ExitStatus,
    },

    #[error("Archiver failed extracting {} ({status})", .archive.display())]
    RestoreSubprocessFailed {
        archive: PathBuf,
        status: ExitStatus,
    },

    #[error("Chooser failed ({0})")]
    ChooserFailed(ExitStatus),

    #[error("Interrupted by user")]
    UserInterrupt,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
