// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `config show --json` stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config(ConfigCommands::Generate { overwrite }) => {
            let paths = commands::resolve_paths(&cli.paths)?;
            commands::cmd_config_generate(&paths, overwrite)
        }
        Commands::Config(ConfigCommands::Show { json }) => {
            let paths = commands::resolve_paths(&cli.paths)?;
            commands::cmd_config_show(&paths, json)
        }
        Commands::Bootstrap {
            no_overwrite,
            yes,
            source_dir,
        } => {
            let paths = commands::resolve_paths(&cli.paths)?;
            commands::cmd_bootstrap(&paths, !no_overwrite, yes, source_dir.as_deref())
        }
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
