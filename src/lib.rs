//! dwmc-backup library
//!
//! Incremental filesystem backups and restores orchestrated over external
//! tools: `tar` for the archive container and incremental delta tracking,
//! `pigz` for compression, `fzf` for interactive snapshot selection.

pub mod backup;
pub mod config;
pub mod context;
pub mod external;
pub mod journal;
pub mod restore;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use context::Context;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
