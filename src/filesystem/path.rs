// src/filesystem/path.rs

//! Lexical path handling for untrusted names
//!
//! Archive member names are attacker controlled. Containment is decided on the
//! path text alone, without touching the filesystem: `..` is resolved against
//! the preceding component and the result must still start with the root.
//!
//! # Examples
//!
//! ```
//! use metronotes_setup::filesystem::path::is_within;
//! use std::path::Path;
//!
//! let root = Path::new("/var/lib/metronotes");
//! assert!(is_within(root, &root.join("metronotesd.9.db")));
//! assert!(!is_within(root, &root.join("../../etc/passwd")));
//! assert!(!is_within(root, &root.join("/etc/passwd")));
//! ```

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem
///
/// `..` at the root stays at the root, as the OS does.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                None | Some(Component::ParentDir) | Some(Component::CurDir) => {
                    normalized.push("..")
                }
            },
            Component::Normal(c) => normalized.push(c),
        }
    }

    normalized
}

/// Absolute, lexically normalized form of a path
///
/// Relative paths are taken relative to the current directory. Symlinks are
/// not resolved.
pub fn absolute_lexical(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| {
        Error::InvalidPath(format!("Cannot make {} absolute: {}", path.display(), e))
    })?;
    Ok(normalize_lexically(&absolute))
}

/// Whether `target` stays inside `root` once both are normalized
///
/// Compares whole components, so `/data-evil` is not inside `/data`.
pub fn is_within(root: &Path, target: &Path) -> bool {
    normalize_lexically(target).starts_with(normalize_lexically(root))
}
