//! dwmc-backup - Main entry point
//!
//! Parses the single positional action, bootstraps configuration and paths,
//! and dispatches to the backup or restore operation. Setup failures print
//! remediation guidance and exit 1 before any journal exists; runtime
//! failures land in the error journal. Ctrl+C exits 0.

use clap::error::ErrorKind;
use clap::Parser;
use dwmc_backup::external::{self, FzfChooser, PigzTarArchiver};
use dwmc_backup::journal::Journal;
use dwmc_backup::utils::logger;
use dwmc_backup::{backup, restore, BackupError, Config, Context};

const USAGE: &str = "usage: {backup|restore}";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Action to perform
    #[arg(value_enum)]
    action: Action,

    /// Console log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Action {
    Backup,
    Restore,
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(_) => {
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    logger::init(&args.log_level);

    std::process::exit(run(args.action).await);
}

/// Setup phase, then the selected operation. Returns the process exit code.
async fn run(action: Action) -> i32 {
    let config_path = match Config::default_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    let config = match Config::from_file(&config_path) {
        Ok(config) => config,
        Err(BackupError::ConfigMissing(path)) => {
            if let Err(e) = dwmc_backup::config::bootstrap_missing(&path) {
                eprintln!("{e}");
            }
            // Even a freshly written template only holds placeholders.
            return 1;
        }
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    if let Err(e) = external::preflight().await {
        eprintln!("{e}");
        eprintln!("> Please install it and try again.");
        return 1;
    }

    let ctx = match Context::bootstrap(&config) {
        Ok(ctx) => ctx,
        Err(e @ BackupError::SourceNotDirectory(_)) => {
            eprintln!("{e}");
            eprintln!("> Please create the directory and try again.");
            return 1;
        }
        Err(e @ BackupError::BackupPathConflict(_)) => {
            eprintln!("{e}");
            eprintln!("> Please delete the file and try again.");
            return 1;
        }
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    let journal = Journal::new(ctx.journal_path.clone(), ctx.error_journal_path.clone());
    let archiver = PigzTarArchiver;
    let chooser = FzfChooser;

    let operation = async {
        match action {
            Action::Backup => backup::run(&ctx, &journal, &archiver).await,
            Action::Restore => restore::run(&ctx, &journal, &archiver, &chooser).await,
        }
    };

    // The subprocesses share our terminal; Ctrl+C reaches them through the
    // process group, we only have to report the interrupt and leave.
    let result = tokio::select! {
        result = operation => result,
        _ = tokio::signal::ctrl_c() => Err(BackupError::UserInterrupt),
    };

    match result {
        Ok(()) => 0,
        Err(BackupError::UserInterrupt) => {
            println!("Interrupt, exiting...");
            0
        }
        Err(e) => {
            let journaled = journal
                .error(&format!("Error: {e}"))
                .and_then(|_| journal.error(&format!("Details: {e:?}")));
            if journaled.is_err() {
                eprintln!("Error: {e}");
            }
            1
        }
    }
}
