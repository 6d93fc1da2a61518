// src/commands/bootstrap.rs
//! Database bootstrap command

use super::progress::BarProgress;
use anyhow::{Context, Result};
use metronotes_setup::bootstrap::{
    fetch_and_install, BootstrapOptions, BootstrapOutcome, Fetcher, HttpFetcher, LocalFetcher,
    Network,
};
use metronotes_setup::progress::{LogProgress, ProgressTracker};
use metronotes_setup::prompt::{AssumeAnswer, Prompt};
use metronotes_setup::SetupPaths;
use std::io::IsTerminal;
use std::path::Path;
use tracing::info;

fn progress_for(network: Network) -> Box<dyn ProgressTracker> {
    if std::io::stderr().is_terminal() {
        Box::new(BarProgress::new(network.archive_file_name()))
    } else {
        Box::new(LogProgress::new(network.archive_file_name()))
    }
}

/// Download (or copy from `source_dir`) and install both databases
pub fn cmd_bootstrap(
    paths: &SetupPaths,
    overwrite: bool,
    assume_yes: bool,
    source_dir: Option<&Path>,
) -> Result<()> {
    let fetcher: Box<dyn Fetcher> = match source_dir {
        Some(dir) => {
            info!("Installing snapshots from {}", dir.display());
            Box::new(LocalFetcher::new(dir))
        }
        None => Box::new(HttpFetcher::new()?),
    };

    let options = BootstrapOptions {
        overwrite,
        ask_confirmation: !assume_yes,
    };

    let result = if assume_yes {
        fetch_and_install(paths, fetcher.as_ref(), &mut AssumeAnswer(true), progress_for, options)
    } else {
        fetch_and_install(paths, fetcher.as_ref(), &mut Prompt::stdio(), progress_for, options)
    };
    let outcome =
        result.with_context(|| format!("Bootstrap into {} failed", paths.data_dir.display()))?;

    match outcome {
        BootstrapOutcome::Skipped(existing) => {
            println!(
                "Database already present at {}, nothing to do.",
                existing.display()
            );
        }
        BootstrapOutcome::Declined => {
            println!("Bootstrap cancelled.");
        }
        BootstrapOutcome::Installed(files) => {
            println!("Installed {} database(s):", files.len());
            for file in files {
                println!("  {}", file.display());
            }
        }
    }
    Ok(())
}
