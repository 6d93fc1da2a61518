// src/paths.rs

//! Per-platform locations used by setup
//!
//! Defaults follow each platform's user config/data directory conventions
//! (via `dirs`). Every location can be overridden, which is how the CLI
//! flags and the tests point setup somewhere else.

use crate::bootstrap::Network;
use crate::config::schema::APP_NAME;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Vendor directory level used on Windows
const APP_AUTHOR: &str = "Metronotes";

/// Application name of the previous installation
const LEGACY_APP_NAME: &str = "metronotesd";

/// Rendered server config file name
pub const SERVER_CONFIG_FILE: &str = "server.conf";

/// Rendered client config file name
pub const CLIENT_CONFIG_FILE: &str = "client.conf";

/// Wallet daemon config file name
pub const FOREIGN_CONFIG_FILE: &str = "bitcoin.conf";

/// Directory layout for one setup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPaths {
    /// Where `server.conf` and `client.conf` are written
    pub config_dir: PathBuf,
    /// Where bootstrapped databases are placed
    pub data_dir: PathBuf,
    /// The wallet daemon's `bitcoin.conf`
    pub foreign_daemon_config: PathBuf,
    /// `metronotesd.conf` of a previous installation
    pub legacy_config: PathBuf,
}

/// Append the app directory, with the vendor level on Windows
fn app_dir(base: PathBuf, app_name: &str) -> PathBuf {
    if cfg!(windows) {
        base.join(APP_AUTHOR).join(app_name)
    } else {
        base.join(app_name)
    }
}

/// Default location of the wallet daemon's data directory
fn foreign_daemon_dir() -> Option<PathBuf> {
    if cfg!(any(target_os = "macos", windows)) {
        dirs::data_dir().map(|d| d.join("Bitcoin"))
    } else {
        dirs::home_dir().map(|h| h.join(".bitcoin"))
    }
}

impl SetupPaths {
    /// Detect the platform defaults for the current user
    pub fn detect() -> Result<Self> {
        let config_base = dirs::config_dir()
            .ok_or_else(|| Error::InitError("Cannot determine user config directory".into()))?;
        let data_base = dirs::data_dir()
            .ok_or_else(|| Error::InitError("Cannot determine user data directory".into()))?;
        let foreign_dir = foreign_daemon_dir()
            .ok_or_else(|| Error::InitError("Cannot determine home directory".into()))?;

        let legacy_dir = app_dir(config_base.clone(), LEGACY_APP_NAME);

        Ok(Self {
            config_dir: app_dir(config_base, APP_NAME),
            data_dir: app_dir(data_base, APP_NAME),
            foreign_daemon_config: foreign_dir.join(FOREIGN_CONFIG_FILE),
            legacy_config: legacy_dir.join(format!("{}.conf", LEGACY_APP_NAME)),
        })
    }

    /// Layout rooted entirely under one directory
    ///
    /// Config goes to `<root>/config`, data to `<root>/data`, and the probed
    /// files are expected at `<root>/bitcoin.conf` and `<root>/metronotesd.conf`.
    pub fn under(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            foreign_daemon_config: root.join(FOREIGN_CONFIG_FILE),
            legacy_config: root.join(format!("{}.conf", LEGACY_APP_NAME)),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_foreign_daemon_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.foreign_daemon_config = path.into();
        self
    }

    pub fn with_legacy_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_config = path.into();
        self
    }

    /// Path of the rendered server config
    pub fn server_config_file(&self) -> PathBuf {
        self.config_dir.join(SERVER_CONFIG_FILE)
    }

    /// Path of the rendered client config
    pub fn client_config_file(&self) -> PathBuf {
        self.config_dir.join(CLIENT_CONFIG_FILE)
    }

    /// Final location of a network's database
    pub fn database_file(&self, network: Network) -> PathBuf {
        self.data_dir.join(network.database_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_layout() {
        let paths = SetupPaths::under(Path::new("/tmp/setup"));
        assert_eq!(
            paths.server_config_file(),
            PathBuf::from("/tmp/setup/config/server.conf")
        );
        assert_eq!(
            paths.client_config_file(),
            PathBuf::from("/tmp/setup/config/client.conf")
        );
        assert_eq!(
            paths.database_file(Network::Mainnet),
            PathBuf::from("/tmp/setup/data/metronotes.db")
        );
        assert_eq!(
            paths.database_file(Network::Testnet),
            PathBuf::from("/tmp/setup/data/metronotes.testnet.db")
        );
    }

    #[test]
    fn test_overrides() {
        let paths = SetupPaths::under(Path::new("/a"))
            .with_config_dir("/b")
            .with_data_dir("/c")
            .with_foreign_daemon_config("/d/bitcoin.conf")
            .with_legacy_config("/e/old.conf");
        assert_eq!(paths.config_dir, PathBuf::from("/b"));
        assert_eq!(paths.data_dir, PathBuf::from("/c"));
        assert_eq!(paths.foreign_daemon_config, PathBuf::from("/d/bitcoin.conf"));
        assert_eq!(paths.legacy_config, PathBuf::from("/e/old.conf"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_linux_defaults() {
        let Ok(paths) = SetupPaths::detect() else {
            return;
        };
        assert!(paths.config_dir.ends_with("metronotes"));
        assert!(paths.foreign_daemon_config.ends_with(".bitcoin/bitcoin.conf"));
        assert!(paths.legacy_config.ends_with("metronotesd/metronotesd.conf"));
    }
}
