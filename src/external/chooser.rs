//! Process-backed interactive chooser: `fzf`.

use super::Chooser;
use crate::utils::{BackupError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// fzf exits 130 when the user cancels (ESC or Ctrl-C) and 1 when the query
/// matched nothing. Neither is a tool failure.
const FZF_NO_MATCH: i32 = 1;
const FZF_CANCELLED: i32 = 130;

#[derive(Debug, Clone, Copy, Default)]
pub struct FzfChooser;

impl Chooser for FzfChooser {
    async fn select(&self, candidates: &[String]) -> Result<Option<String>> {
        let mut child = Command::new("fzf")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(candidates.join("\n").as_bytes()).await?;
            // Dropping the handle closes the pipe so fzf sees EOF.
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return match output.status.code() {
                Some(FZF_NO_MATCH) | Some(FZF_CANCELLED) => Ok(None),
                _ => Err(BackupError::ChooserFailed(output.status)),
            };
        }

        let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
