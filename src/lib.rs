//! dupsift - content-based duplicate file finder.
//!
//! Files under a directory are narrowed down in three stages, each only
//! reading files that survived the previous one:
//!
//! 1. group by size (metadata only)
//! 2. group by SHA-256 of the first 256 KiB
//! 3. group by SHA-256 of the full content, streamed in 1 MiB blocks
//!
//! Every group left with two or more files is reported as a
//! [`DuplicateSet`](duplicates::DuplicateSet).
//!
//! # Example
//!
//! ```no_run
//! let sets = dupsift::find_duplicates("/home/user/Downloads").unwrap();
//! for set in &sets {
//!     println!("{} ({} files)", set.digest, set.len());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicateSet, FinderError};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};

/// Find every set of identical files under `root` with default settings.
///
/// Unreadable files and directories are skipped. Sets are ordered by
/// their first path, and paths within a set are sorted.
///
/// # Errors
///
/// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`]
/// if `root` is not an existing directory.
pub fn find_duplicates(root: impl AsRef<Path>) -> Result<Vec<DuplicateSet>, FinderError> {
    DuplicateFinder::with_defaults()
        .find_duplicates(root.as_ref())
        .map(|(sets, _)| sets)
}

/// Global options that affect how a command reports.
struct Globals {
    quiet: bool,
    no_color: bool,
}

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the scan root is not a
/// directory, the scan is interrupted, or the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let Cli {
        verbose,
        quiet,
        no_color,
        json_errors: _,
        config,
        command,
    } = cli;

    if logging::init_logging(verbose, quiet).is_err() {
        log::debug!("Logger already initialized");
    }

    let config = Config::load(config.as_deref()).context("Failed to load configuration")?;
    let globals = Globals { quiet, no_color };

    match command {
        Commands::Scan(args) => run_scan(&globals, config, &args),
    }
}

fn run_scan(globals: &Globals, mut config: Config, args: &ScanArgs) -> Result<ExitCode> {
    config.apply_scan_args(args);
    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler()?;
    let show_progress = !(args.no_progress || globals.quiet);
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(!show_progress));

    let finder = DuplicateFinder::new(
        config
            .finder_config()
            .with_shutdown_flag(handler.get_flag())
            .with_progress_callback(progress),
    );

    let (sets, summary) = finder
        .find_duplicates(&args.path)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    for err in &summary.scan_errors {
        log::debug!("Skipped: {}", err);
    }
    for err in &summary.hash_errors {
        log::debug!("Skipped: {}", err);
    }

    let exit_code = ExitCode::for_scan(!sets.is_empty(), summary.has_errors());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => {
            let color = !globals.no_color && stdout.is_terminal();
            TextOutput::new(&sets, &summary)
                .with_color(color)
                .with_summary(!globals.quiet)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&sets, &summary, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write report")?;
        }
    }
    out.flush().context("Failed to write report")?;

    Ok(exit_code)
}
