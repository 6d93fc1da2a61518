// src/cli/config.rs
//! Config file commands

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write server.conf and client.conf if they do not exist yet
    Generate {
        /// Regenerate both files, including a new RPC password
        #[arg(long)]
        overwrite: bool,
    },

    /// Show the settings discovered in bitcoin.conf and the legacy config
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
