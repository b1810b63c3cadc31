//! Append-only on-disk activity journal.
//!
//! Two files under the backup root: `_backup.log` for normal activity and
//! `_error.log` for failures. Both are created lazily on the first write and
//! only ever appended to; this tool never rotates or truncates them. Every
//! journaled message is also echoed to stdout.

use crate::utils::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Journal {
    log_path: PathBuf,
    error_path: PathBuf,
}

impl Journal {
    pub fn new(log_path: PathBuf, error_path: PathBuf) -> Self {
        Self {
            log_path,
            error_path,
        }
    }

    /// Append `message` to the selected journal file and echo it to stdout.
    ///
    /// Each call writes one complete line; under single-process use there is
    /// no partial interleaving.
    pub fn log(&self, message: &str, is_error: bool) -> Result<()> {
        // Both files exist after the first write of either kind.
        touch(&self.log_path)?;
        touch(&self.error_path)?;

        let target = if is_error {
            &self.error_path
        } else {
            &self.log_path
        };
        let mut file = OpenOptions::new().append(true).open(target)?;

        println!("{message}");
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{stamp}] {message}")?;
        Ok(())
    }

    pub fn info(&self, message: &str) -> Result<()> {
        self.log(message, false)
    }

    pub fn error(&self, message: &str) -> Result<()> {
        self.log(message, true)
    }
}

fn touch(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        File::create(path)?;
    }
    Ok(())
}
