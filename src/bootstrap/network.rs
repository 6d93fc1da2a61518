// src/bootstrap/network.rs

//! The two networks a database snapshot exists for

use std::fmt;

/// Base URL all bootstrap archives are served from
pub const BOOTSTRAP_BASE_URL: &str = "https://s3.amazonaws.com/metronotes-bootstrap/";

/// Ledger network with a downloadable database snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Install order: mainnet first
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    /// Archive file name on the bootstrap server
    pub fn archive_file_name(self) -> &'static str {
        match self {
            Self::Mainnet => "metronotesd-db.latest.tar.gz",
            Self::Testnet => "metronotesd-testnet-db.latest.tar.gz",
        }
    }

    /// Download URL of the snapshot archive
    pub fn url(self) -> String {
        format!("{}{}", BOOTSTRAP_BASE_URL, self.archive_file_name())
    }

    /// Database file name inside the archive
    pub fn payload_file_name(self) -> &'static str {
        match self {
            Self::Mainnet => "metronotesd.9.db",
            Self::Testnet => "metronotesd.9.testnet.db",
        }
    }

    /// File name of the installed database in the data directory
    pub fn database_file_name(self) -> &'static str {
        match self {
            Self::Mainnet => "metronotes.db",
            Self::Testnet => "metronotes.testnet.db",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            Network::Mainnet.url(),
            "https://s3.amazonaws.com/metronotes-bootstrap/metronotesd-db.latest.tar.gz"
        );
        assert_eq!(
            Network::Testnet.url(),
            "https://s3.amazonaws.com/metronotes-bootstrap/metronotesd-testnet-db.latest.tar.gz"
        );
    }

    #[test]
    fn test_install_order() {
        assert_eq!(Network::ALL, [Network::Mainnet, Network::Testnet]);
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }
}
