// src/commands/system.rs
//! Shell completions

use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    generate(shell, &mut command, "metronotes-setup", &mut io::stdout());
    Ok(())
}
