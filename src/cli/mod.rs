// src/cli/mod.rs
//! CLI definitions for metronotes-setup
//!
//! The command implementations are in the `commands` module.
//!
//! - `config generate` / `config show` - config discovery and config files
//! - `bootstrap` - download and install the database snapshots
//! - `completions` - shell completion scripts

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod config;

pub use config::ConfigCommands;

#[derive(Parser)]
#[command(name = "metronotes-setup")]
#[command(author = "Metronotes Contributors")]
#[command(version)]
#[command(about = "First-run setup for a Metronotes node", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Location overrides; platform defaults apply to anything not given
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory for server.conf and client.conf
    #[arg(long, global = true, env = "METRONOTES_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory for the databases
    #[arg(long, global = true, env = "METRONOTES_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Wallet daemon config to probe
    #[arg(long, global = true, value_name = "PATH")]
    pub bitcoin_conf: Option<PathBuf>,

    /// Config of a previous metronotesd installation
    #[arg(long, global = true, value_name = "PATH")]
    pub legacy_conf: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Config file discovery and generation
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Download and install the mainnet and testnet databases
    Bootstrap {
        /// Keep an existing mainnet database instead of replacing it
        #[arg(long)]
        no_overwrite: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Install from archives already downloaded into this directory
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_path_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "metronotes-setup",
            "config",
            "generate",
            "--config-dir",
            "/tmp/conf",
            "--overwrite",
        ])
        .unwrap();

        assert_eq!(cli.paths.config_dir, Some(PathBuf::from("/tmp/conf")));
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Generate { overwrite: true })
        ));
    }

    #[test]
    fn test_bootstrap_flags() {
        let cli = Cli::try_parse_from(["metronotes-setup", "bootstrap", "-y", "--no-overwrite"])
            .unwrap();
        match cli.command {
            Commands::Bootstrap {
                no_overwrite,
                yes,
                source_dir,
            } => {
                assert!(no_overwrite);
                assert!(yes);
                assert!(source_dir.is_none());
            }
            _ => panic!("expected bootstrap"),
        }
    }
}
