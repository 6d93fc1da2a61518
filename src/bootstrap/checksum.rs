// src/bootstrap/checksum.rs

//! `checksums.txt` manifests shipped inside bootstrap archives
//!
//! The format is the one `sha256sum` writes: one `<hex>  <name>` line per
//! file, or `<hex> *<name>` for binary mode. Lines that do not parse are
//! ignored, so a manifest carrying other digests does not break the install.

use crate::error::{Error, Result};
use crate::hash::{is_sha256_hex, verify_file_sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Manifest file name inside an archive
pub const MANIFEST_FILE_NAME: &str = "checksums.txt";

/// File name to lowercase hex SHA-256
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumManifest {
    entries: BTreeMap<String, String>,
}

impl ChecksumManifest {
    /// Parse manifest text
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .filter_map(|line| {
                let (digest, rest) = line.trim().split_once(char::is_whitespace)?;
                if !is_sha256_hex(digest) {
                    return None;
                }
                let name = rest.trim_start();
                let name = name.strip_prefix('*').unwrap_or(name);
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), digest.to_ascii_lowercase()))
            })
            .collect();

        Self { entries }
    }

    /// Read the manifest in `dir`, if there is one
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(Self::parse(&content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Expected digest for a file name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify `path` if the manifest lists `name`
    ///
    /// Returns whether a check was made. Files the manifest does not list
    /// pass unchecked.
    pub fn verify(&self, name: &str, path: &Path) -> Result<bool> {
        let Some(expected) = self.get(name) else {
            debug!("{} not listed in {}", name, MANIFEST_FILE_NAME);
            return Ok(false);
        };

        verify_file_sha256(path, expected)?;
        info!("Checksum verified for {}", name);
        Ok(true)
    }
}
