//! Configuration loading and first-run bootstrap.
//!
//! The configuration lives at `~/.dwmc-backup.conf`, a flat TOML document
//! with two required keys:
//!
//! ```text
//! SOURCE_DIR='<absolute_path_to_source_directory>'
//! BACKUP_DIR='<absolute_path_to_backup_directory>'
//! ```
//!
//! It is read once at startup and immutable for the process lifetime. When
//! the file is missing, [`bootstrap_missing`] prints setup instructions and
//! offers to write a placeholder template; the caller exits non-zero either
//! way, since placeholders are not usable paths.

use crate::utils::{BackupError, Result};
use serde::Deserialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".dwmc-backup.conf";

const TEMPLATE: &str = "\
SOURCE_DIR='<absolute_path_to_source_directory>'
BACKUP_DIR='<absolute_path_to_backup_directory>'
";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory whose contents get backed up. Must already exist.
    #[serde(rename = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Backup storage root. Created on first run if absent.
    #[serde(rename = "BACKUP_DIR")]
    pub backup_dir: PathBuf,
}

impl Config {
    /// Fixed per-user configuration path, derived from the home directory.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BackupError::ConfigInvalid("home directory not found".to_string()))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load and validate the configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BackupError::ConfigMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| BackupError::ConfigInvalid(e.message().to_string()))?;
        Ok(config)
    }
}

/// Outcome of the missing-config prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapDecision {
    WriteTemplate,
    Skip,
}

/// Decide from the typed answer whether a template config should be written.
pub fn bootstrap_decision(answer: &str) -> BootstrapDecision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => BootstrapDecision::WriteTemplate,
        _ => BootstrapDecision::Skip,
    }
}

pub fn write_template(path: &Path) -> Result<()> {
    fs::write(path, TEMPLATE)?;
    Ok(())
}

/// Interactive handler for a missing configuration file. Prints the expected
/// file content and, on confirmation, writes the template. The process must
/// still exit non-zero afterwards.
pub fn bootstrap_missing(path: &Path) -> Result<()> {
    println!();
    println!("{} not found", path.display());
    println!();
    println!("Please create {} with the following content:", path.display());
    println!("> SOURCE_DIR='<absolute_path_to_source_directory>'");
    println!("> BACKUP_DIR='<absolute_path_to_backup_directory>'");
    println!();
    print!("Would you like to create a template file now? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    if bootstrap_decision(&answer) == BootstrapDecision::WriteTemplate {
        write_template(path)?;
        println!("Template written to {}", path.display());
    }
    Ok(())
}
