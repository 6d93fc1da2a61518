// src/config/mod.rs

//! Configuration discovery and config file generation
//!
//! A first run writes two files into the config directory:
//! - `server.conf`, from settings found in `bitcoin.conf` and a legacy
//!   `metronotesd.conf`, plus a generated RPC password
//! - `client.conf`, whose keys are translated from the server's so the client
//!   talks to the same wallet and server
//!
//! Once `server.conf` exists nothing is regenerated (unless asked to), which
//! keeps user edits and the generated password stable.

pub mod probe;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod value;

pub use probe::{probe_foreign_daemon_config, probe_legacy_config, RewriteRule};
pub use render::{render, render_to_string};
pub use resolve::{derive_client_config, probe_sources, resolve_server_config};
pub use schema::{client_config_args, server_config_args, ArgumentSpec};
pub use value::{ConfigMapping, ConfigValue, FixedDecimal};

use crate::error::Result;
use crate::paths::SetupPaths;
use std::path::PathBuf;
use tracing::info;

/// What happened to one config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The file was (re)written
    Written(PathBuf),
    /// An existing file was left alone
    Kept(PathBuf),
    /// Not considered, because the server config already existed
    Skipped(PathBuf),
}

impl FileStatus {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Written(p) | Self::Kept(p) | Self::Skipped(p) => p,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Outcome of [`generate_config_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub server: FileStatus,
    pub client: FileStatus,
}

/// Write `server.conf` and `client.conf` on first run
///
/// If `server.conf` already exists and `overwrite` is false, nothing is
/// probed, no password is generated and neither file is touched.
pub fn generate_config_files(paths: &SetupPaths, overwrite: bool) -> Result<ConfigReport> {
    let server_path = paths.server_config_file();
    let client_path = paths.client_config_file();

    if !overwrite && server_path.exists() {
        info!(
            "{} already exists, leaving configuration as is",
            server_path.display()
        );
        return Ok(ConfigReport {
            server: FileStatus::Kept(server_path),
            client: FileStatus::Skipped(client_path),
        });
    }

    let server_config = resolve_server_config(paths)?;
    let server_written = render(&server_path, &server_config_args(), &server_config, overwrite)?;

    let client_config = derive_client_config(&server_config);
    let client_written = render(&client_path, &client_config_args(), &client_config, overwrite)?;

    let status = |written: bool, path: PathBuf| {
        if written {
            FileStatus::Written(path)
        } else {
            FileStatus::Kept(path)
        }
    };

    Ok(ConfigReport {
        server: status(server_written, server_path),
        client: status(client_written, client_path),
    })
}
