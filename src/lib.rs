// src/lib.rs

//! Metronotes node setup
//!
//! First-run preparation for a Metronotes node:
//!
//! - Configuration: probe the wallet daemon's `bitcoin.conf` and a legacy
//!   `metronotesd.conf`, merge them, and write commented `server.conf` and
//!   `client.conf` files
//! - Bootstrap: download database snapshots for mainnet and testnet, extract
//!   them without letting archive members escape the scratch directory, and
//!   install the databases with restricted permissions
//!
//! # Architecture
//!
//! - Explicit state: resolved settings are plain `ConfigMapping` values
//!   passed between steps
//! - Trait seams at the edges: `Fetcher` for transport, `ArchiveReader` for
//!   archive formats, `ProgressTracker` for feedback, `Confirm` for prompts
//! - Every on-disk location comes from `SetupPaths`, so runs can be pointed
//!   at any directory

pub mod archive;
pub mod bootstrap;
pub mod config;
mod error;
pub mod filesystem;
pub mod hash;
pub mod paths;
pub mod progress;
pub mod prompt;

pub use archive::{safe_extract, ArchiveMember, ArchiveReader, MemberLink, TarGzArchive};
pub use bootstrap::{
    fetch_and_install, BootstrapOptions, BootstrapOutcome, Fetcher, HttpFetcher, LocalFetcher,
    Network,
};
pub use config::{
    generate_config_files, ConfigMapping, ConfigReport, ConfigValue, FileStatus, FixedDecimal,
};
pub use error::{Error, Result};
pub use paths::SetupPaths;
pub use progress::{CallbackProgress, LogProgress, ProgressEvent, ProgressTracker, SilentProgress};
pub use prompt::{AssumeAnswer, Confirm, Prompt};
