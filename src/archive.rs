// src/archive.rs

//! Safe archive extraction
//!
//! Extraction is two passes over the archive:
//! 1. list every member and check that its target (and link target, for
//!    links) stays under the destination root
//! 2. only if every member passed, unpack everything
//!
//! A single bad member rejects the whole archive before any byte is written.
//! The check works on [`ArchiveMember`] lists, so it does not depend on the
//! reader; [`TarGzArchive`] is the reader used for bootstrap snapshots.

use crate::error::{Error, Result};
use crate::filesystem::{absolute_lexical, is_within, normalize_lexically};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info, warn};

/// One archive member as seen by the safety check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Name as stored in the archive
    pub name: PathBuf,
    /// Link kind and target, for symlinks and hard links
    pub link: Option<MemberLink>,
}

/// Link target of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLink {
    /// Resolved relative to the directory containing the link
    Symlink(PathBuf),
    /// Resolved relative to the archive root
    Hardlink(PathBuf),
}

impl ArchiveMember {
    /// A plain member without a link target
    pub fn file(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            link: None,
        }
    }
}

/// An archive that can list its members and unpack itself
pub trait ArchiveReader {
    /// All members, in archive order
    fn members(&mut self) -> Result<Vec<ArchiveMember>>;

    /// Unpack every member under `destination`
    fn unpack_all(&mut self, destination: &Path) -> Result<()>;
}

/// Gzip-compressed tar archive on disk
#[derive(Debug, Clone)]
pub struct TarGzArchive {
    path: PathBuf,
}

impl TarGzArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Archive<GzDecoder<File>>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::IoError(format!("Failed to open archive {}: {}", self.path.display(), e))
        })?;
        Ok(Archive::new(GzDecoder::new(file)))
    }

    fn read_error(&self, e: impl std::fmt::Display) -> Error {
        Error::ParseError(format!(
            "Failed to read archive {}: {}",
            self.path.display(),
            e
        ))
    }
}

impl ArchiveReader for TarGzArchive {
    fn members(&mut self) -> Result<Vec<ArchiveMember>> {
        let mut archive = self.open()?;
        let mut members = Vec::new();

        for entry in archive.entries().map_err(|e| self.read_error(e))? {
            let entry = entry.map_err(|e| self.read_error(e))?;
            let name = entry.path().map_err(|e| self.read_error(e))?.into_owned();

            let entry_type = entry.header().entry_type();
            let link = if entry_type.is_symlink() || entry_type.is_hard_link() {
                let target = entry
                    .link_name()
                    .map_err(|e| self.read_error(e))?
                    .map(|t| t.into_owned())
                    .unwrap_or_default();
                Some(if entry_type.is_symlink() {
                    MemberLink::Symlink(target)
                } else {
                    MemberLink::Hardlink(target)
                })
            } else {
                None
            };

            members.push(ArchiveMember { name, link });
        }

        Ok(members)
    }

    fn unpack_all(&mut self, destination: &Path) -> Result<()> {
        let mut archive = self.open()?;
        archive.unpack(destination).map_err(|e| {
            Error::IoError(format!(
                "Failed to extract {} into {}: {}",
                self.path.display(),
                destination.display(),
                e
            ))
        })
    }
}

/// Check one member against the absolute, normalized destination root
fn check_member(member: &ArchiveMember, root: &Path) -> Result<()> {
    if member.name.as_os_str().is_empty() {
        return Err(Error::InvalidPath("archive member with an empty name".into()));
    }

    let target = normalize_lexically(&root.join(&member.name));
    if !is_within(root, &target) {
        warn!("Archive member escapes destination: {}", member.name.display());
        return Err(Error::PathTraversal(member.name.display().to_string()));
    }

    let link_target = match &member.link {
        None => return Ok(()),
        Some(MemberLink::Symlink(link)) => {
            let parent = target.parent().unwrap_or(root);
            parent.join(link)
        }
        Some(MemberLink::Hardlink(link)) => root.join(link),
    };

    if !is_within(root, &link_target) {
        warn!(
            "Archive link {} points outside destination",
            member.name.display()
        );
        return Err(Error::PathTraversal(format!(
            "{} -> {}",
            member.name.display(),
            link_target.display()
        )));
    }

    Ok(())
}

/// Check every member; fails on the first one that escapes `destination_root`
pub fn check_members(members: &[ArchiveMember], destination_root: &Path) -> Result<()> {
    let root = absolute_lexical(destination_root)?;
    members.iter().try_for_each(|m| check_member(m, &root))
}

/// Extract an archive after checking all of its members
///
/// Nothing is written unless every member stays under `destination_root`.
pub fn safe_extract<A>(archive: &mut A, destination_root: &Path) -> Result<()>
where
    A: ArchiveReader + ?Sized,
{
    let members = archive.members()?;
    debug!(
        "Checking {} archive member(s) against {}",
        members.len(),
        destination_root.display()
    );
    check_members(&members, destination_root)?;

    archive.unpack_all(destination_root)?;
    info!(
        "Extracted {} member(s) into {}",
        members.len(),
        destination_root.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader over a fixed member list that records whether it unpacked
    struct ListedArchive {
        members: Vec<ArchiveMember>,
        unpacked: bool,
    }

    impl ArchiveReader for ListedArchive {
        fn members(&mut self) -> Result<Vec<ArchiveMember>> {
            Ok(self.members.clone())
        }

        fn unpack_all(&mut self, _destination: &Path) -> Result<()> {
            self.unpacked = true;
            Ok(())
        }
    }

    fn listed(names: &[&str]) -> ListedArchive {
        ListedArchive {
            members: names.iter().map(|n| ArchiveMember::file(*n)).collect(),
            unpacked: false,
        }
    }

    #[test]
    fn test_safe_members_are_unpacked() {
        let mut archive = listed(&["metronotesd.9.db", "checksums.txt", "./sub/file"]);
        safe_extract(&mut archive, Path::new("/tmp/extract")).unwrap();
        assert!(archive.unpacked);
    }

    #[test]
    fn test_traversal_rejects_whole_archive() {
        let mut archive = listed(&["metronotesd.9.db", "../../etc/passwd"]);
        let err = safe_extract(&mut archive, Path::new("/tmp/extract")).unwrap_err();
        assert!(matches!(err, Error::PathTraversal(_)));
        assert!(!archive.unpacked);
    }

    #[test]
    fn test_absolute_member_rejected() {
        let mut archive = listed(&["/etc/passwd"]);
        let err = safe_extract(&mut archive, Path::new("/tmp/extract")).unwrap_err();
        assert!(matches!(err, Error::PathTraversal(_)));
        assert!(!archive.unpacked);
    }

    #[test]
    fn test_sibling_prefix_rejected() {
        let members = vec![ArchiveMember::file("../extract-evil/x")];
        assert!(check_members(&members, Path::new("/tmp/extract")).is_err());
    }

    #[test]
    fn test_inner_parent_dir_allowed() {
        let members = vec![ArchiveMember::file("a/b/../c")];
        check_members(&members, Path::new("/tmp/extract")).unwrap();
    }

    #[test]
    fn test_empty_name_rejected() {
        let members = vec![ArchiveMember::file("")];
        assert!(matches!(
            check_members(&members, Path::new("/tmp/extract")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_symlink_targets_checked() {
        let inside = ArchiveMember {
            name: "sub/link".into(),
            link: Some(MemberLink::Symlink("../data.db".into())),
        };
        check_members(&[inside], Path::new("/tmp/extract")).unwrap();

        let outside = ArchiveMember {
            name: "sub/link".into(),
            link: Some(MemberLink::Symlink("../../etc/shadow".into())),
        };
        assert!(check_members(&[outside], Path::new("/tmp/extract")).is_err());

        let absolute = ArchiveMember {
            name: "link".into(),
            link: Some(MemberLink::Symlink("/etc/shadow".into())),
        };
        assert!(check_members(&[absolute], Path::new("/tmp/extract")).is_err());
    }

    #[test]
    fn test_hardlink_targets_checked() {
        let outside = ArchiveMember {
            name: "link".into(),
            link: Some(MemberLink::Hardlink("../outside".into())),
        };
        assert!(matches!(
            check_members(&[outside], Path::new("/tmp/extract")),
            Err(Error::PathTraversal(_))
        ));
    }
}
