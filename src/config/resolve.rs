// src/config/resolve.rs

//! Merging discovered configuration into server and client mappings
//!
//! Precedence, lowest to highest:
//! 1. the wallet daemon's `bitcoin.conf` (a guess at how to reach the backend)
//! 2. the legacy `metronotesd.conf` (settings a user chose before)
//!
//! Schema defaults are not merged here; the renderer falls back to them for
//! keys that are still unresolved.

use super::probe::{probe_foreign_daemon_config, probe_legacy_config};
use super::value::{ConfigMapping, ConfigValue};
use crate::error::Result;
use crate::hash::dhash_hex;
use crate::paths::SetupPaths;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, info};

/// Key holding the server's JSON-RPC password
pub const RPC_PASSWORD_KEY: &str = "rpc-password";

/// Number of random bytes fed into a generated password
const PASSWORD_ENTROPY_BYTES: usize = 16;

/// Server key to client key
pub const CLIENT_KEY_TRANSLATION: &[(&str, &str)] = &[
    ("backend-connect", "wallet-connect"),
    ("backend-port", "wallet-port"),
    ("backend-user", "wallet-user"),
    ("backend-password", "wallet-password"),
    ("backend-ssl", "wallet-ssl"),
    ("backend-ssl-verify", "wallet-ssl-verify"),
    ("rpc-host", "metronotes-rpc-connect"),
    ("rpc-port", "metronotes-rpc-port"),
    ("rpc-user", "metronotes-rpc-user"),
    ("rpc-password", "metronotes-rpc-password"),
];

/// Overlay `overrides` on `base`; keys in `overrides` win
pub fn merge(base: &ConfigMapping, overrides: &ConfigMapping) -> ConfigMapping {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Probe both sources and merge them, without generating anything
pub fn probe_sources(paths: &SetupPaths) -> Result<ConfigMapping> {
    let foreign = probe_foreign_daemon_config(&paths.foreign_daemon_config)?;
    let legacy = probe_legacy_config(&paths.legacy_config)?;
    debug!(
        "Merging {} daemon setting(s) with {} legacy setting(s)",
        foreign.len(),
        legacy.len()
    );
    Ok(merge(&foreign, &legacy))
}

/// Random hex password: 16 bytes from the OS RNG, double SHA-256, hex
pub fn generate_rpc_password() -> String {
    let mut entropy = [0u8; PASSWORD_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);
    dhash_hex(&entropy)
}

/// Return the mapping with an `rpc-password`, generating one if absent
pub fn with_rpc_password(resolved: ConfigMapping) -> ConfigMapping {
    if resolved.contains_key(RPC_PASSWORD_KEY) {
        return resolved;
    }

    info!("No RPC password configured, generating one");
    let mut resolved = resolved;
    resolved.insert(
        RPC_PASSWORD_KEY.to_string(),
        ConfigValue::Text(generate_rpc_password()),
    );
    resolved
}

/// Resolve the server mapping for a first run
///
/// Always carries an `rpc-password`; callers decide whether a first run is
/// happening at all (see [`super::generate_config_files`]).
pub fn resolve_server_config(paths: &SetupPaths) -> Result<ConfigMapping> {
    Ok(with_rpc_password(probe_sources(paths)?))
}

/// Translate a server mapping into the client's keys
///
/// Keys without an entry in [`CLIENT_KEY_TRANSLATION`] are dropped.
pub fn derive_client_config(server: &ConfigMapping) -> ConfigMapping {
    CLIENT_KEY_TRANSLATION
        .iter()
        .filter_map(|(server_key, client_key)| {
            server
                .get(*server_key)
                .map(|value| (client_key.to_string(), value.clone()))
        })
        .collect()
}
