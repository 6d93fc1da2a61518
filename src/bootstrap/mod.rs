// src/bootstrap/mod.rs

//! Database bootstrap from published snapshots
//!
//! A fresh node would need days to build its database from the blockchain.
//! Bootstrap instead downloads a snapshot archive per network, extracts it
//! safely and installs the database file into the data directory.
//!
//! # Steps
//!
//! 1. skip if the mainnet database exists and overwriting is off
//! 2. ask for confirmation, if requested; a refusal changes nothing
//! 3. create the data directory
//! 4. for mainnet, then testnet: download into a scratch directory, extract,
//!    verify against `checksums.txt` when present, move into place
//! 5. remove the scratch directory
//!
//! A failure stops the run. Databases installed before the failure stay.

mod checksum;
mod fetch;
mod network;

pub use checksum::{ChecksumManifest, MANIFEST_FILE_NAME};
pub use fetch::{file_name_from_url, Fetcher, HttpFetcher, LocalFetcher};
pub use network::{Network, BOOTSTRAP_BASE_URL};

use crate::archive::{safe_extract, TarGzArchive};
use crate::error::{Error, Result};
use crate::filesystem::{create_dir_restricted, move_file, restrict_file_permissions};
use crate::paths::SetupPaths;
use crate::progress::ProgressTracker;
use crate::prompt::Confirm;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Scratch directory name prefix inside the data directory
const SCRATCH_PREFIX: &str = ".bootstrap-";

/// Question asked before anything is downloaded
pub fn confirmation_question() -> String {
    format!(
        "Would you like to bootstrap your local Metronotes database from `{}`? (y/N): ",
        BOOTSTRAP_BASE_URL
    )
}

/// How a bootstrap run behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Replace existing databases
    pub overwrite: bool,
    /// Ask before downloading
    pub ask_confirmation: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            ask_confirmation: false,
        }
    }
}

/// Result of a bootstrap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The mainnet database already existed
    Skipped(PathBuf),
    /// The user said no
    Declined,
    /// Installed database files, in install order
    Installed(Vec<PathBuf>),
}

/// Download, check and install one network's database
fn install_network(
    network: Network,
    paths: &SetupPaths,
    scratch: &Path,
    fetcher: &dyn Fetcher,
    progress: &dyn ProgressTracker,
) -> Result<PathBuf> {
    let archive_path = scratch.join(network.archive_file_name());
    let url = network.url();

    match fetcher.fetch(&url, &archive_path, progress) {
        Ok(bytes) => {
            progress.finish_with_message(&format!("{} [done]", network.archive_file_name()));
            debug!("Fetched {} bytes for {} via {}", bytes, network, fetcher.name());
        }
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            return Err(e);
        }
    }

    let extract_dir = scratch.join(format!("{}-extract", network));
    create_dir_restricted(&extract_dir)?;
    safe_extract(&mut TarGzArchive::new(&archive_path), &extract_dir)?;

    let payload = extract_dir.join(network.payload_file_name());
    if !payload.is_file() {
        return Err(Error::NotFoundError(format!(
            "{} not found in {}",
            network.payload_file_name(),
            network.archive_file_name()
        )));
    }

    if let Some(manifest) = ChecksumManifest::load(&extract_dir)? {
        manifest.verify(network.payload_file_name(), &payload)?;
    }

    let destination = paths.database_file(network);
    move_file(&payload, &destination)?;
    restrict_file_permissions(&destination)?;

    info!("Installed {} database at {}", network, destination.display());
    Ok(destination)
}

/// Bootstrap both networks' databases into `paths.data_dir`
///
/// `new_progress` is called once per network, before its download starts.
pub fn fetch_and_install<C, P>(
    paths: &SetupPaths,
    fetcher: &dyn Fetcher,
    confirm: &mut C,
    new_progress: P,
    options: BootstrapOptions,
) -> Result<BootstrapOutcome>
where
    C: Confirm + ?Sized,
    P: Fn(Network) -> Box<dyn ProgressTracker>,
{
    let mainnet_db = paths.database_file(Network::Mainnet);
    if !options.overwrite && mainnet_db.exists() {
        info!("{} already exists, skipping bootstrap", mainnet_db.display());
        return Ok(BootstrapOutcome::Skipped(mainnet_db));
    }

    if options.ask_confirmation && !confirm.confirm(&confirmation_question())? {
        info!("Bootstrap declined");
        return Ok(BootstrapOutcome::Declined);
    }

    create_dir_restricted(&paths.data_dir)?;

    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(&paths.data_dir)
        .map_err(|e| {
            Error::IoError(format!(
                "Failed to create scratch directory in {}: {}",
                paths.data_dir.display(),
                e
            ))
        })?;
    debug!("Using scratch directory {}", scratch.path().display());

    let mut installed = Vec::with_capacity(Network::ALL.len());
    for network in Network::ALL {
        let progress = new_progress(network);
        installed.push(install_network(
            network,
            paths,
            scratch.path(),
            fetcher,
            progress.as_ref(),
        )?);
    }

    let scratch_path = scratch.path().to_path_buf();
    scratch.close().map_err(|e| {
        Error::IoError(format!(
            "Failed to remove scratch directory {}: {}",
            scratch_path.display(),
            e
        ))
    })?;

    Ok(BootstrapOutcome::Installed(installed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use crate::prompt::AssumeAnswer;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Fetcher that must never be reached
    struct UnreachableFetcher {
        calls: Cell<u32>,
    }

    impl Fetcher for UnreachableFetcher {
        fn fetch(&self, url: &str, _dest: &Path, _progress: &dyn ProgressTracker) -> Result<u64> {
            self.calls.set(self.calls.get() + 1);
            Err(Error::DownloadError(format!("unexpected fetch of {url}")))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn silent(_: Network) -> Box<dyn ProgressTracker> {
        Box::new(SilentProgress::new())
    }

    #[test]
    fn test_question_text() {
        assert_eq!(
            confirmation_question(),
            "Would you like to bootstrap your local Metronotes database from \
             `https://s3.amazonaws.com/metronotes-bootstrap/`? (y/N): "
        );
    }

    #[test]
    fn test_declined_has_no_side_effects() {
        let temp = TempDir::new().unwrap();
        let paths = SetupPaths::under(temp.path());
        let fetcher = UnreachableFetcher { calls: Cell::new(0) };

        let outcome = fetch_and_install(
            &paths,
            &fetcher,
            &mut AssumeAnswer(false),
            silent,
            BootstrapOptions {
                overwrite: true,
                ask_confirmation: true,
            },
        )
        .unwrap();

        assert_eq!(outcome, BootstrapOutcome::Declined);
        assert_eq!(fetcher.calls.get(), 0);
        assert!(!paths.data_dir.exists());
    }

    #[test]
    fn test_existing_database_skips_before_prompt() {
        let temp = TempDir::new().unwrap();
        let paths = SetupPaths::under(temp.path());
        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::write(paths.database_file(Network::Mainnet), b"db").unwrap();
        let fetcher = UnreachableFetcher { calls: Cell::new(0) };

        let outcome = fetch_and_install(
            &paths,
            &fetcher,
            &mut AssumeAnswer(true),
            silent,
            BootstrapOptions {
                overwrite: false,
                ask_confirmation: true,
            },
        )
        .unwrap();

        assert_eq!(
            outcome,
            BootstrapOutcome::Skipped(paths.database_file(Network::Mainnet))
        );
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn test_fetch_failure_removes_scratch() {
        let temp = TempDir::new().unwrap();
        let paths = SetupPaths::under(temp.path());
        let fetcher = UnreachableFetcher { calls: Cell::new(0) };

        let result = fetch_and_install(
            &paths,
            &fetcher,
            &mut AssumeAnswer(true),
            silent,
            BootstrapOptions::default(),
        );

        assert!(matches!(result, Err(Error::DownloadError(_))));
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(std::fs::read_dir(&paths.data_dir).unwrap().count(), 0);
    }
}
