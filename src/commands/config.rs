// src/commands/config.rs
//! Config file generation and inspection

use anyhow::{Context, Result};
use metronotes_setup::config::{generate_config_files, probe_sources, FileStatus};
use metronotes_setup::SetupPaths;
use tracing::info;

fn describe(status: &FileStatus) -> String {
    match status {
        FileStatus::Written(path) => format!("  wrote   {}", path.display()),
        FileStatus::Kept(path) => format!("  kept    {}", path.display()),
        FileStatus::Skipped(path) => format!("  skipped {}", path.display()),
    }
}

/// Write server.conf and client.conf on first run
pub fn cmd_config_generate(paths: &SetupPaths, overwrite: bool) -> Result<()> {
    info!("Generating configuration in {}", paths.config_dir.display());

    let report = generate_config_files(paths, overwrite).with_context(|| {
        format!(
            "Failed to generate configuration in {}",
            paths.config_dir.display()
        )
    })?;

    println!("Configuration:");
    println!("{}", describe(&report.server));
    println!("{}", describe(&report.client));

    if !report.server.was_written() {
        println!("Use --overwrite to regenerate (this replaces the RPC password).");
    }
    Ok(())
}

/// Print what the probed sources resolve to, without writing anything
pub fn cmd_config_show(paths: &SetupPaths, json: bool) -> Result<()> {
    let resolved = probe_sources(paths).context("Failed to read existing configuration")?;

    if json {
        let output = serde_json::json!({
            "bitcoin_conf": paths.foreign_daemon_config,
            "legacy_conf": paths.legacy_config,
            "server_conf": paths.server_config_file(),
            "client_conf": paths.client_config_file(),
            "resolved": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let presence = |exists: bool| if exists { "" } else { " (not found)" };
    println!(
        "bitcoin.conf:     {}{}",
        paths.foreign_daemon_config.display(),
        presence(paths.foreign_daemon_config.exists())
    );
    println!(
        "metronotesd.conf: {}{}",
        paths.legacy_config.display(),
        presence(paths.legacy_config.exists())
    );
    println!();

    if resolved.is_empty() {
        println!("No settings found.");
    } else {
        for (key, value) in &resolved {
            println!("{} = {}", key, value.render());
        }
    }
    Ok(())
}
