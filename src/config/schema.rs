// src/config/schema.rs

//! Argument schemas of the Metronotes server and client programs
//!
//! Each program's command line is described by an ordered list of
//! [`ArgumentSpec`]s. The renderer walks that list to decide which keys a
//! config file contains, in what order, with which help text and default.

use super::value::{ConfigValue, FixedDecimal};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Application name used for directories and database file names
pub const APP_NAME: &str = "metronotes";

/// Default fee per kilobyte, in 1e-8 units (0.0001)
const DEFAULT_FEE_PER_KB: i64 = 10_000;

/// Default regular dust output size, in 1e-8 units
const DEFAULT_REGULAR_DUST_SIZE: i64 = 5_430;

/// Default multisig dust output size, in 1e-8 units
const DEFAULT_MULTISIG_DUST_SIZE: i64 = 7_800;

/// Default OP_RETURN output value, in 1e-8 units
const DEFAULT_OP_RETURN_VALUE: i64 = 0;

/// Default backend poll interval in seconds (0.5)
const DEFAULT_BACKEND_POLL_INTERVAL: i64 = 50_000_000;

const DEFAULT_RPC_BATCH_SIZE: &str = "20";
const DEFAULT_REQUESTS_TIMEOUT: &str = "20";

/// One entry of a program's argument schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Flag spellings; the last one is canonical (`-v`, `--verbose`)
    pub flags: Vec<&'static str>,
    /// Help text, written as a comment above the key
    pub help: String,
    /// Typed default used when no source resolved the key
    pub default: Option<ConfigValue>,
}

impl ArgumentSpec {
    /// Create a spec without a default
    pub fn new(flags: &[&'static str], help: impl Into<String>) -> Self {
        Self {
            flags: flags.to_vec(),
            help: help.into(),
            default: None,
        }
    }

    /// Attach a default value
    pub fn with_default(mut self, default: impl Into<ConfigValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Canonical config key: the last flag without its leading dashes
    pub fn key(&self) -> &str {
        self.flags
            .last()
            .map(|flag| flag.trim_start_matches('-'))
            .unwrap_or_default()
    }

    /// Check that every spec has a non-empty key and that keys are unique
    pub fn validate_schema(schema: &[ArgumentSpec]) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in schema {
            let key = spec.key();
            if key.is_empty() {
                return Err(Error::InvalidValue(format!(
                    "argument spec without a flag name: {:?}",
                    spec.flags
                )));
            }
            if !seen.insert(key) {
                return Err(Error::InvalidValue(format!("duplicate config key '{}'", key)));
            }
        }
        Ok(())
    }
}

fn decimal(units: i64) -> FixedDecimal {
    FixedDecimal::from_units(units)
}

/// Arguments shared by both programs
fn common_args() -> Vec<ArgumentSpec> {
    vec![
        ArgumentSpec::new(&["-v", "--verbose"], "sets log level to DEBUG instead of WARNING")
            .with_default(false),
        ArgumentSpec::new(&["--testnet"], "use Bitcoin testnet addresses and block numbers")
            .with_default(false),
        ArgumentSpec::new(&["--testcoin"], "use the test Metronotes network on every blockchain")
            .with_default(false),
    ]
}

/// Schema of `metronotes-server`
pub fn server_config_args() -> Vec<ArgumentSpec> {
    let mut args = common_args();
    args.extend([
        ArgumentSpec::new(&["--backend-name"], "the backend name to connect to")
            .with_default("addrindex"),
        ArgumentSpec::new(&["--backend-connect"], "the hostname or IP of the backend server")
            .with_default("localhost"),
        ArgumentSpec::new(&["--backend-port"], "the backend port to connect to"),
        ArgumentSpec::new(&["--backend-user"], "the username used to communicate with backend")
            .with_default("bitcoinrpc"),
        ArgumentSpec::new(&["--backend-password"], "the password used to communicate with backend"),
        ArgumentSpec::new(&["--backend-ssl"], "use SSL to connect to backend (default: false)")
            .with_default(false),
        ArgumentSpec::new(
            &["--backend-ssl-no-verify"],
            "verify SSL certificate of backend; disallow use of self-signed certificates (default: true)",
        )
        .with_default(false),
        ArgumentSpec::new(&["--backend-poll-interval"], "poll interval, in seconds (default: 0.5)")
            .with_default(decimal(DEFAULT_BACKEND_POLL_INTERVAL)),
        ArgumentSpec::new(
            &["--rpc-host"],
            "the IP of the interface to bind to for providing JSON-RPC API access (0.0.0.0 for all interfaces)",
        )
        .with_default("localhost"),
        ArgumentSpec::new(&["--rpc-port"], "port on which to provide the metronotes JSON-RPC API"),
        ArgumentSpec::new(
            &["--rpc-user"],
            "required username to use the metronotes JSON-RPC API (via HTTP basic auth)",
        )
        .with_default("rpc"),
        ArgumentSpec::new(
            &["--rpc-password"],
            "required password (for rpc-user) to use the metronotes JSON-RPC API (via HTTP basic auth)",
        ),
        ArgumentSpec::new(&["--rpc-no-allow-cors"], "allow ajax cross domain request")
            .with_default(false),
        ArgumentSpec::new(
            &["--rpc-batch-size"],
            format!("number of RPC queries by batch (default: {})", DEFAULT_RPC_BATCH_SIZE),
        )
        .with_default(DEFAULT_RPC_BATCH_SIZE),
        ArgumentSpec::new(
            &["--requests-timeout"],
            format!(
                "timeout value (in seconds) used for all HTTP requests (default: {})",
                DEFAULT_REQUESTS_TIMEOUT
            ),
        )
        .with_default(DEFAULT_REQUESTS_TIMEOUT),
        ArgumentSpec::new(
            &["--force"],
            "skip backend check, version check, process lock (NOT FOR USE ON PRODUCTION SYSTEMS)",
        )
        .with_default(false),
        ArgumentSpec::new(&["--database-file"], "the path to the SQLite3 database file"),
        ArgumentSpec::new(
            &["--log-file"],
            "log to the specified file (specify option without filename to use the default location)",
        ),
        ArgumentSpec::new(
            &["--api-log-file"],
            "log API requests to the specified file (specify option without filename to use the default location)",
        ),
    ]);
    args
}

/// Schema of `metronotes-client`
pub fn client_config_args() -> Vec<ArgumentSpec> {
    let mut args = common_args();
    args.extend([
        ArgumentSpec::new(
            &["--metronotes-rpc-connect"],
            "the hostname or IP of the metronotes JSON-RPC server",
        )
        .with_default("localhost"),
        ArgumentSpec::new(&["--metronotes-rpc-port"], "the port of the metronotes JSON-RPC server"),
        ArgumentSpec::new(
            &["--metronotes-rpc-user"],
            "the username for the metronotes JSON-RPC server",
        )
        .with_default("rpc"),
        ArgumentSpec::new(
            &["--metronotes-rpc-password"],
            "the password for the metronotes JSON-RPC server",
        ),
        ArgumentSpec::new(
            &["--metronotes-rpc-ssl"],
            "use SSL to connect to the metronotes server (default: false)",
        )
        .with_default(false),
        ArgumentSpec::new(
            &["--metronotes-rpc-ssl-verify"],
            "verify SSL certificate of the metronotes server; disallow use of self-signed certificates (default: false)",
        )
        .with_default(false),
        ArgumentSpec::new(&["--wallet-name"], "the wallet name to connect to")
            .with_default("bitcoincore"),
        ArgumentSpec::new(&["--wallet-connect"], "the hostname or IP of the wallet server")
            .with_default("localhost"),
        ArgumentSpec::new(&["--wallet-port"], "the wallet port to connect to"),
        ArgumentSpec::new(&["--wallet-user"], "the username used to communicate with wallet")
            .with_default("bitcoinrpc"),
        ArgumentSpec::new(&["--wallet-password"], "the password used to communicate with wallet"),
        ArgumentSpec::new(&["--wallet-ssl"], "use SSL to connect to wallet (default: false)")
            .with_default(false),
        ArgumentSpec::new(
            &["--wallet-ssl-verify"],
            "verify SSL certificate of wallet; disallow use of self-signed certificates (default: false)",
        )
        .with_default(false),
        ArgumentSpec::new(&["--json-output"], "display result in json format").with_default(false),
        ArgumentSpec::new(&["--unconfirmed"], "allow the spending of unconfirmed transaction outputs")
            .with_default(false),
        ArgumentSpec::new(&["--encoding"], "data encoding method").with_default("auto"),
        ArgumentSpec::new(&["--fee-per-kb"], "fee per kilobyte, in BTC (default: 0.0001)")
            .with_default(decimal(DEFAULT_FEE_PER_KB)),
        ArgumentSpec::new(
            &["--regular-dust-size"],
            "value for dust Pay-to-Pubkey-Hash outputs, in BTC (default: 0.0000543)",
        )
        .with_default(decimal(DEFAULT_REGULAR_DUST_SIZE)),
        ArgumentSpec::new(
            &["--multisig-dust-size"],
            "for OP_CHECKMULTISIG outputs, in BTC (default: 0.000078)",
        )
        .with_default(decimal(DEFAULT_MULTISIG_DUST_SIZE)),
        ArgumentSpec::new(&["--op-return-value"], "value for OP_RETURN outputs, in BTC (default: 0)")
            .with_default(decimal(DEFAULT_OP_RETURN_VALUE)),
        ArgumentSpec::new(&["--unsigned"], "print out unsigned hex of transaction; do not sign or broadcast")
            .with_default(false),
        ArgumentSpec::new(&["--disable-utxo-locks"], "disable locking of UTXOs being spent")
            .with_default(false),
        ArgumentSpec::new(&["--dust-return-pubkey"], "pubkey for dust outputs (required for P2SH)"),
        ArgumentSpec::new(
            &["--requests-timeout"],
            format!(
                "timeout value (in seconds) used for all HTTP requests (default: {})",
                DEFAULT_REQUESTS_TIMEOUT
            ),
        )
        .with_default(DEFAULT_REQUESTS_TIMEOUT),
    ]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strips_dashes_from_last_flag() {
        let spec = ArgumentSpec::new(&["-v", "--verbose"], "help");
        assert_eq!(spec.key(), "verbose");

        let spec = ArgumentSpec::new(&["--backend-port"], "help");
        assert_eq!(spec.key(), "backend-port");
    }

    #[test]
    fn test_shipped_schemas_have_unique_keys() {
        ArgumentSpec::validate_schema(&server_config_args()).unwrap();
        ArgumentSpec::validate_schema(&client_config_args()).unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let schema = vec![
            ArgumentSpec::new(&["--rpc-port"], "a"),
            ArgumentSpec::new(&["-p", "--rpc-port"], "b"),
        ];
        assert!(ArgumentSpec::validate_schema(&schema).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let schema = vec![ArgumentSpec::new(&[], "no flags")];
        assert!(ArgumentSpec::validate_schema(&schema).is_err());
    }

    #[test]
    fn test_client_schema_covers_translated_keys() {
        let keys: Vec<String> = client_config_args()
            .iter()
            .map(|s| s.key().to_string())
            .collect();
        for key in ["wallet-connect", "wallet-port", "metronotes-rpc-password"] {
            assert!(keys.iter().any(|k| k == key), "missing {}", key);
        }
    }
}
