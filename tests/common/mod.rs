// tests/common/mod.rs

//! Shared helpers for integration tests: snapshot archives built in-process.

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use metronotes_setup::bootstrap::{Network, MANIFEST_FILE_NAME};
use metronotes_setup::hash::sha256;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tar::{EntryType, Header};

/// One archive member
///
/// Names are written into the header verbatim, so hostile names such as
/// `../x` or `/etc/passwd` end up in the archive as given.
pub enum Member<'a> {
    File(&'a str, &'a [u8]),
    Symlink(&'a str, &'a str),
}

fn raw_header(name: &str, entry_type: EntryType, size: u64) -> Header {
    let mut header = Header::new_old();
    let bytes = name.as_bytes();
    header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
    header.set_entry_type(entry_type);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_mtime(0);
    header
}

/// Write a gzip-compressed tar archive
pub fn write_tar_gz(path: &Path, members: &[Member]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for member in members {
        match member {
            Member::File(name, data) => {
                let mut header = raw_header(name, EntryType::Regular, data.len() as u64);
                header.set_cksum();
                builder.append(&header, *data).unwrap();
            }
            Member::Symlink(name, target) => {
                let mut header = raw_header(name, EntryType::Symlink, 0);
                let target = target.as_bytes();
                header.as_old_mut().linkname[..target.len()].copy_from_slice(target);
                header.set_cksum();
                builder.append(&header, std::io::empty()).unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap();
}

/// `checksums.txt` content listing `name` with the digest of `data`
pub fn manifest_for(name: &str, data: &[u8]) -> String {
    format!("{}  {}\n", hex::encode(sha256(data)), name)
}

/// Directory of snapshot archives laid out for `LocalFetcher`
pub struct Mirror {
    pub dir: PathBuf,
}

impl Mirror {
    pub fn new(dir: PathBuf) -> Self {
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    pub fn archive_path(&self, network: Network) -> PathBuf {
        self.dir.join(network.archive_file_name())
    }

    /// Publish an archive with arbitrary members
    pub fn publish(&self, network: Network, members: &[Member]) {
        write_tar_gz(&self.archive_path(network), members);
    }

    /// Publish a well-formed snapshot with a matching checksum manifest
    pub fn publish_database(&self, network: Network, data: &[u8]) {
        let manifest = manifest_for(network.payload_file_name(), data);
        self.publish(
            network,
            &[
                Member::File(network.payload_file_name(), data),
                Member::File(MANIFEST_FILE_NAME, manifest.as_bytes()),
            ],
        );
    }
}
