// src/commands/mod.rs
//! Command handlers for the metronotes-setup CLI

mod bootstrap;
mod config;
pub mod progress;
mod system;

pub use bootstrap::cmd_bootstrap;
pub use config::{cmd_config_generate, cmd_config_show};
pub use system::cmd_completions;

use crate::cli::PathArgs;
use anyhow::{Context, Result};
use metronotes_setup::SetupPaths;

/// Platform defaults with the command-line overrides applied
pub fn resolve_paths(args: &PathArgs) -> Result<SetupPaths> {
    let mut paths = SetupPaths::detect().context("Failed to determine default directories")?;

    if let Some(dir) = &args.config_dir {
        paths = paths.with_config_dir(dir);
    }
    if let Some(dir) = &args.data_dir {
        paths = paths.with_data_dir(dir);
    }
    if let Some(path) = &args.bitcoin_conf {
        paths = paths.with_foreign_daemon_config(path);
    }
    if let Some(path) = &args.legacy_conf {
        paths = paths.with_legacy_config(path);
    }

    Ok(paths)
}
