// src/filesystem/mod.rs

//! Filesystem helpers shared by config rendering and bootstrap
//!
//! - Lexical path containment checks for archive extraction
//! - Owner/group-only directory creation and file permissions
//! - Moving files across filesystems

pub mod path;
mod permissions;

pub use path::{absolute_lexical, is_within, normalize_lexically};
pub use permissions::{
    create_dir_restricted, move_file, restrict_file_permissions, DIR_MODE, FILE_MODE,
};
