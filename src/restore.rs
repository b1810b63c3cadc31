//! The `restore` operation: pick a snapshot interactively and replay the
//! incremental chain, oldest first, up to the chosen point in time.
//!
//! Every snapshot only holds changes since the previous one, so restoring a
//! point in time means extracting the whole chain from the first snapshot
//! through the selected one, in order. Newer snapshots are never touched.

use crate::context::Context;
use crate::external::{Archiver, Chooser};
use crate::journal::Journal;
use crate::utils::Result;
use chrono::{TimeZone, Utc};
use std::fs;
use std::io;

/// Parse the unix timestamp out of a `backup_<digits>.tar.gz` name.
/// Anything else in the snapshot directory is not a candidate.
fn snapshot_timestamp(name: &str) -> Option<u64> {
    let stem = name.strip_prefix("backup_")?.strip_suffix(".tar.gz")?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Filter directory entries down to snapshot archives, newest first.
pub fn candidates(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut stamped: Vec<(u64, String)> = names
        .into_iter()
        .filter_map(|name| snapshot_timestamp(&name).map(|ts| (ts, name)))
        .collect();
    stamped.sort_by(|a, b| b.0.cmp(&a.0));
    stamped.into_iter().map(|(_, name)| name).collect()
}

/// Decorate a candidate for display: the file name plus its capture time.
pub fn label(name: &str) -> String {
    match snapshot_timestamp(name).and_then(|ts| Utc.timestamp_opt(ts as i64, 0).single()) {
        Some(when) => format!("{name} ({})", when.format("%Y-%m-%dT%H:%M:%SZ")),
        None => name.to_string(),
    }
}

/// The replay chain for `selected`: oldest first, up to and including it.
///
/// `newest_first` is the candidate list as presented. Returns an empty chain
/// when the selection is not among the candidates.
pub fn replay_chain<'a>(newest_first: &'a [String], selected: &str) -> Vec<&'a str> {
    let Some(pos) = newest_first.iter().position(|name| name == selected) else {
        return Vec::new();
    };
    newest_first[pos..].iter().rev().map(String::as_str).collect()
}

pub async fn run<A, C>(ctx: &Context, journal: &Journal, archiver: &A, chooser: &C) -> Result<()>
where
    A: Archiver,
    C: Chooser,
{
    let mut names = Vec::new();
    for entry in fs::read_dir(&ctx.snapshots_dir)? {
        if let Ok(name) = entry?.file_name().into_string() {
            names.push(name);
        }
    }

    let choices = candidates(names);
    if choices.is_empty() {
        println!("No backups found.");
        return Ok(());
    }

    let labels: Vec<String> = choices.iter().map(|name| label(name)).collect();
    let selected = match chooser.select(&labels).await? {
        Some(line) => labels
            .iter()
            .position(|l| *l == line.trim())
            .map(|i| choices[i].clone()),
        None => None,
    };
    let Some(selected) = selected else {
        println!("No backup selected. Restore aborted.");
        return Ok(());
    };

    // The restore directory only ever holds the latest restore's output.
    match fs::remove_dir_all(&ctx.restore_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(&ctx.restore_dir)?;

    for name in replay_chain(&choices, &selected) {
        journal.info(&format!("Restoring incremental backup: {name}"))?;
        archiver
            .extract(&ctx.snapshots_dir.join(name), &ctx.restore_dir)
            .await?;
    }

    journal.info("Restore completed.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::utils::BackupError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeArchiver {
        extracted: Mutex<Vec<PathBuf>>,
        fail_on: Option<String>,
    }

    impl FakeArchiver {
        fn new() -> Self {
            Self {
                extracted: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn extracted_names(&self) -> Vec<String> {
            self.extracted
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }
    }

    impl Archiver for FakeArchiver {
        async fn create(&self, _archive: &Path, _snar: &Path, _source: &Path) -> Result<()> {
            unreachable!("restore never creates archives");
        }

        async fn extract(&self, archive: &Path, _dest: &Path) -> Result<()> {
            let name = archive.file_name().unwrap().to_string_lossy().into_owned();
            if self.fail_on.as_deref() == Some(name.as_str()) {
                return Err(BackupError::Io(io::Error::other("tar blew up")));
            }
            self.extracted.lock().unwrap().push(archive.to_path_buf());
            Ok(())
        }
    }

    /// Picks the candidate whose label contains the given needle.
    struct FakeChooser {
        pick: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeChooser {
        fn picking(needle: &str) -> Self {
            Self {
                pick: Some(needle.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn cancelling() -> Self {
            Self {
                pick: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Chooser for FakeChooser {
        async fn select(&self, candidates: &[String]) -> Result<Option<String>> {
            *self.seen.lock().unwrap() = candidates.to_vec();
            let Some(needle) = &self.pick else {
                return Ok(None);
            };
            Ok(candidates.iter().find(|c| c.contains(needle)).cloned())
        }
    }

    fn context_in(temp_dir: &TempDir) -> Context {
        let source = temp_dir.path().join("source");
        fs::create_dir_all(&source).unwrap();
        Context::bootstrap(&Config {
            source_dir: source,
            backup_dir: temp_dir.path().join("backups"),
        })
        .unwrap()
    }

    fn journal_for(ctx: &Context) -> Journal {
        Journal::new(ctx.journal_path.clone(), ctx.error_journal_path.clone())
    }

    fn seed_snapshots(ctx: &Context, names: &[&str]) {
        for name in names {
            fs::write(ctx.snapshots_dir.join(name), b"archive").unwrap();
        }
    }

    #[test]
    fn test_candidates_filter_and_order() {
        let names = vec![
            "backup_200.tar.gz".to_string(),
            "notes.txt".to_string(),
            "backup_abc.tar.gz".to_string(),
            "backup_100.tar.gz".to_string(),
            "backup_.tar.gz".to_string(),
            "backup_300.tar.gz".to_string(),
            "backup.snar".to_string(),
        ];
        assert_eq!(
            candidates(names),
            vec![
                "backup_300.tar.gz",
                "backup_200.tar.gz",
                "backup_100.tar.gz"
            ]
        );
    }

    #[test]
    fn test_labels_use_the_snapshot_own_timestamp() {
        assert_eq!(
            label("backup_1700000000.tar.gz"),
            "backup_1700000000.tar.gz (2023-11-14T22:13:20Z)"
        );
    }

    #[test]
    fn test_replay_chain_stops_at_selection() {
        let newest_first = vec![
            "backup_300.tar.gz".to_string(),
            "backup_200.tar.gz".to_string(),
            "backup_100.tar.gz".to_string(),
        ];
        assert_eq!(
            replay_chain(&newest_first, "backup_200.tar.gz"),
            vec!["backup_100.tar.gz", "backup_200.tar.gz"]
        );
        assert_eq!(
            replay_chain(&newest_first, "backup_300.tar.gz"),
            vec![
                "backup_100.tar.gz",
                "backup_200.tar.gz",
                "backup_300.tar.gz"
            ]
        );
        assert!(replay_chain(&newest_first, "backup_999.tar.gz").is_empty());
    }

    #[tokio::test]
    async fn test_restore_replays_chain_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        seed_snapshots(
            &ctx,
            &["backup_100.tar.gz", "backup_200.tar.gz", "backup_300.tar.gz"],
        );
        let archiver = FakeArchiver::new();
        let chooser = FakeChooser::picking("backup_200");

        run(&ctx, &journal_for(&ctx), &archiver, &chooser)
            .await
            .unwrap();

        assert_eq!(
            archiver.extracted_names(),
            vec!["backup_100.tar.gz", "backup_200.tar.gz"]
        );
        assert!(ctx.restore_dir.is_dir());

        let log = fs::read_to_string(&ctx.journal_path).unwrap();
        assert!(log.contains("Restoring incremental backup: backup_100.tar.gz"));
        assert!(log.contains("Restoring incremental backup: backup_200.tar.gz"));
        assert!(!log.contains("backup_300"));
        assert!(log.contains("Restore completed."));
    }

    #[tokio::test]
    async fn test_restore_presents_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        seed_snapshots(&ctx, &["backup_100.tar.gz", "backup_300.tar.gz"]);
        let archiver = FakeArchiver::new();
        let chooser = FakeChooser::picking("backup_300");

        run(&ctx, &journal_for(&ctx), &archiver, &chooser)
            .await
            .unwrap();

        let seen = chooser.seen.lock().unwrap();
        assert!(seen[0].starts_with("backup_300.tar.gz"));
        assert!(seen[1].starts_with("backup_100.tar.gz"));
    }

    #[tokio::test]
    async fn test_no_snapshots_is_a_clean_return() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        fs::write(ctx.snapshots_dir.join("notes.txt"), b"not a snapshot").unwrap();
        let archiver = FakeArchiver::new();

        run(&ctx, &journal_for(&ctx), &archiver, &FakeChooser::cancelling())
            .await
            .unwrap();

        assert!(archiver.extracted_names().is_empty());
        // No side effects: the restore directory is untouched.
        assert!(!ctx.restore_dir.exists());
    }

    #[tokio::test]
    async fn test_cancelled_selection_aborts_without_side_effects() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        seed_snapshots(&ctx, &["backup_100.tar.gz"]);
        let archiver = FakeArchiver::new();

        run(&ctx, &journal_for(&ctx), &archiver, &FakeChooser::cancelling())
            .await
            .unwrap();

        assert!(archiver.extracted_names().is_empty());
        assert!(!ctx.restore_dir.exists());
    }

    #[tokio::test]
    async fn test_restore_wipes_previous_restore_output() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        seed_snapshots(&ctx, &["backup_100.tar.gz"]);
        fs::create_dir_all(&ctx.restore_dir).unwrap();
        fs::write(ctx.restore_dir.join("stale.txt"), b"from last time").unwrap();

        run(
            &ctx,
            &journal_for(&ctx),
            &FakeArchiver::new(),
            &FakeChooser::picking("backup_100"),
        )
        .await
        .unwrap();

        assert!(ctx.restore_dir.is_dir());
        assert!(!ctx.restore_dir.join("stale.txt").exists());
    }

    #[tokio::test]
    async fn test_extraction_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context_in(&temp_dir);
        seed_snapshots(&ctx, &["backup_100.tar.gz", "backup_200.tar.gz"]);
        let archiver = FakeArchiver {
            fail_on: Some("backup_200.tar.gz".to_string()),
            ..FakeArchiver::new()
        };

        let result = run(
            &ctx,
            &journal_for(&ctx),
            &archiver,
            &FakeChooser::picking("backup_200"),
        )
        .await;

        assert!(result.is_err());
        // The chain stops at the failing snapshot; earlier ones were applied.
        assert_eq!(archiver.extracted_names(), vec!["backup_100.tar.gz"]);
        let log = fs::read_to_string(&ctx.journal_path).unwrap();
        assert!(!log.contains("Restore completed."));
    }
}
