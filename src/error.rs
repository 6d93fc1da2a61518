// src/error.rs

//! Error types for metronotes-setup

use thiserror::Error;

/// Errors produced while resolving configuration or bootstrapping the database
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// An archive member would land outside the extraction root
    #[error("Attempted path traversal in archive: {0}")]
    PathTraversal(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
