// src/config/probe.rs

//! Discovery of configuration left by other programs
//!
//! Two sources are probed:
//! - the wallet daemon's `bitcoin.conf` (`key=value` lines, no sections), from
//!   which only backend connection keys are taken;
//! - the `metronotesd.conf` of a previous installation (INI, one `[Default]`
//!   section), whose keys and values are migrated through [`RewriteRule`]s.
//!
//! A missing file is never an error: it contributes an empty mapping.

use super::value::{ConfigMapping, ConfigValue};
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Section of the legacy config file holding all keys
pub const LEGACY_SECTION: &str = "Default";

/// Daemon key to local key, for the keys worth importing from `bitcoin.conf`
pub const FOREIGN_KEY_TRANSLATION: &[(&str, &str)] = &[
    ("rpcport", "backend-port"),
    ("rpcuser", "backend-user"),
    ("rpcpassword", "backend-password"),
    ("rpcssl", "backend-ssl"),
];

/// Substring rewrite applied to legacy config keys or values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub from: &'static str,
    pub to: &'static str,
}

impl RewriteRule {
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    /// Apply a list of rules in order, each replacing every occurrence
    pub fn apply_all(rules: &[RewriteRule], input: &str) -> String {
        rules
            .iter()
            .fold(input.to_string(), |acc, rule| acc.replace(rule.from, rule.to))
    }
}

/// Key renames from the old naming scheme
pub const LEGACY_KEY_RULES: &[RewriteRule] = &[
    RewriteRule::new("backend-rpc-", "backend-"),
    RewriteRule::new("blockchain-service-name", "backend-name"),
];

/// Backend selector renames
pub const LEGACY_VALUE_RULES: &[RewriteRule] = &[RewriteRule::new("jmcorgan", "addrindex")];

/// Read a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No config file at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(Error::IoError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Parse `bitcoin.conf` content into the local backend keys
pub fn parse_foreign_daemon_config(content: &str) -> ConfigMapping {
    let mut raw = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Any `#` disqualifies the whole line, inline comments included
        if line.is_empty() || line.contains('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            raw.push((key.trim(), value.trim()));
        }
    }

    let mut mapping = ConfigMapping::new();
    for (daemon_key, local_key) in FOREIGN_KEY_TRANSLATION {
        // Last occurrence wins, like the daemon itself
        if let Some((_, value)) = raw.iter().rev().find(|(k, _)| k == daemon_key) {
            mapping.insert(local_key.to_string(), ConfigValue::text(*value));
        }
    }
    mapping
}

/// Parse the `[Default]` section of a legacy INI file, applying migrations
pub fn parse_legacy_config(content: &str) -> ConfigMapping {
    let mut mapping = ConfigMapping::new();
    let mut in_section = false;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name == LEGACY_SECTION;
            continue;
        }

        if !in_section {
            continue;
        }

        let Some((key, value)) = split_ini_line(line) else {
            continue;
        };

        let key = RewriteRule::apply_all(LEGACY_KEY_RULES, &key.to_lowercase());
        let value = RewriteRule::apply_all(LEGACY_VALUE_RULES, value);
        mapping.insert(key, ConfigValue::Text(value));
    }

    mapping
}

/// Split an INI option line on the first `=` or `:`
fn split_ini_line(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    let key = line[..idx].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[idx + 1..].trim()))
}

/// Read backend connection settings from the wallet daemon's config file
pub fn probe_foreign_daemon_config(path: &Path) -> Result<ConfigMapping> {
    let Some(content) = read_optional(path)? else {
        return Ok(ConfigMapping::new());
    };
    let mapping = parse_foreign_daemon_config(&content);
    debug!(
        "Found {} backend setting(s) in {}",
        mapping.len(),
        path.display()
    );
    Ok(mapping)
}

/// Read and migrate the config file of a previous installation
pub fn probe_legacy_config(path: &Path) -> Result<ConfigMapping> {
    let Some(content) = read_optional(path)? else {
        return Ok(ConfigMapping::new());
    };
    let mapping = parse_legacy_config(&content);
    debug!(
        "Imported {} setting(s) from legacy config {}",
        mapping.len(),
        path.display()
    );
    Ok(mapping)
}
