// src/config/render.rs

//! Writing commented config files from an argument schema
//!
//! Output layout:
//!
//! ```text
//! [Default]
//!
//! # the backend port to connect to
//! backend-port = 8332
//!
//! # the password used to communicate with backend
//! # backend-password = 
//! ```
//!
//! Every schema key appears once, in schema order. Keys with neither a
//! resolved value nor a default are written commented out so users can see
//! what is available.

use super::schema::ArgumentSpec;
use super::value::{ConfigMapping, ConfigValue};
use crate::error::{Error, Result};
use crate::filesystem::{absolute_lexical, create_dir_restricted, restrict_file_permissions};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Section header of rendered files
pub const SECTION_HEADER: &str = "[Default]";

/// Render a config file's text
pub fn render_to_string(schema: &[ArgumentSpec], resolved: &ConfigMapping) -> String {
    let mut lines = vec![SECTION_HEADER.to_string(), String::new()];

    for spec in schema {
        let key = spec.key();
        let value: Option<&ConfigValue> = resolved.get(key).or(spec.default.as_ref());

        lines.push(format!("# {}", spec.help));
        match value {
            Some(value) => lines.push(format!("{} = {}", key, value.render())),
            None => lines.push(format!("# {} = ", key)),
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Write a config file unless one already exists
///
/// Returns `true` if the file was written. With `overwrite == false` an
/// existing file is left untouched; the file is opened with `create_new`, so
/// existing content is never truncated.
pub fn render(
    path: &Path,
    schema: &[ArgumentSpec],
    resolved: &ConfigMapping,
    overwrite: bool,
) -> Result<bool> {
    if !overwrite && path.exists() {
        debug!("Keeping existing config {}", path.display());
        return Ok(false);
    }

    let absolute = absolute_lexical(path)?;
    if let Some(parent) = absolute.parent() {
        create_dir_restricted(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Config {} appeared concurrently, keeping it", path.display());
            return Ok(false);
        }
        Err(e) => {
            return Err(Error::IoError(format!(
                "Failed to create {}: {}",
                path.display(),
                e
            )));
        }
    };

    let content = render_to_string(schema, resolved);
    file.write_all(content.as_bytes())
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
    drop(file);

    restrict_file_permissions(path)?;
    info!("Wrote {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::FixedDecimal;
    use std::fs;
    use tempfile::TempDir;

    fn schema() -> Vec<ArgumentSpec> {
        vec![
            ArgumentSpec::new(&["--backend-port"], "the backend port"),
            ArgumentSpec::new(&["--backend-ssl"], "use SSL").with_default(false),
            ArgumentSpec::new(&["--fee-per-kb"], "fee").with_default(FixedDecimal::from_units(10_000)),
            ArgumentSpec::new(&["--rpc-user"], "rpc user").with_default("rpc"),
        ]
    }

    #[test]
    fn test_render_layout() {
        let mut resolved = ConfigMapping::new();
        resolved.insert("rpc-user".into(), ConfigValue::text("alice"));

        let text = render_to_string(&schema(), &resolved);
        let expected = [
            "[Default]",
            "",
            "# the backend port",
            "# backend-port = ",
            "",
            "# use SSL",
            "backend-ssl = 0",
            "",
            "# fee",
            "fee-per-kb = 0.00010000",
            "",
            "# rpc user",
            "rpc-user = alice",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_resolved_flag_renders_as_digit() {
        let mut resolved = ConfigMapping::new();
        resolved.insert("backend-ssl".into(), ConfigValue::Flag(true));

        let text = render_to_string(&schema(), &resolved);
        assert!(text.contains("\nbackend-ssl = 1\n"));
    }

    #[test]
    fn test_render_creates_parents_and_skips_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/server.conf");

        let mut first = ConfigMapping::new();
        first.insert("backend-port".into(), ConfigValue::text("8332"));
        assert!(render(&path, &schema(), &first, false).unwrap());
        let original = fs::read_to_string(&path).unwrap();

        let mut second = ConfigMapping::new();
        second.insert("backend-port".into(), ConfigValue::text("9999"));
        assert!(!render(&path, &schema(), &second, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        assert!(render(&path, &schema(), &second, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("backend-port = 9999"));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("client.conf");
        render(&path, &schema(), &ConfigMapping::new(), false).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o660);
    }

    #[test]
    fn test_render_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = render(&blocker.join("server.conf"), &schema(), &ConfigMapping::new(), false);
        assert!(result.is_err());
    }
}
