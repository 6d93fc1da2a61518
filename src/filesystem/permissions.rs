// src/filesystem/permissions.rs

//! Restrictive permissions for config and database files

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Mode for directories we create: owner/group only
pub const DIR_MODE: u32 = 0o750;

/// Mode for files we write: owner/group read-write, nothing else
pub const FILE_MODE: u32 = 0o660;

/// Create a directory and any missing parents
///
/// Already-existing directories are left as they are. Partially created
/// parents are not removed on failure.
pub fn create_dir_restricted(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder.create(path).map_err(|e| {
        Error::IoError(format!("Failed to create directory {}: {}", path.display(), e))
    })?;
    debug!("Created directory {}", path.display());
    Ok(())
}

/// Set [`FILE_MODE`] on a file (no-op off unix)
pub fn restrict_file_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(FILE_MODE);
        fs::set_permissions(path, perms).map_err(|e| {
            Error::IoError(format!(
                "Failed to set permissions on {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

/// Move a file, falling back to copy + remove across filesystems
///
/// An existing file at `to` is replaced.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    debug!(
        "Rename {} -> {} failed ({}), copying instead",
        from.display(),
        to.display(),
        rename_err
    );
    fs::copy(from, to).map_err(|e| {
        Error::IoError(format!(
            "Failed to copy {} to {}: {} (rename failed: {})",
            from.display(),
            to.display(),
            e,
            rename_err
        ))
    })?;
    fs::remove_file(from).map_err(|e| {
        Error::IoError(format!("Failed to remove {}: {}", from.display(), e))
    })?;
    Ok(())
}
