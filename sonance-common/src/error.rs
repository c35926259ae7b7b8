//! Common error types for Sonance

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Sonance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Sonance binaries
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vector or metadata file missing or structurally invalid.
    ///
    /// Fatal: the service refuses to serve recommendations until corrected.
    #[error("Load error ({path}): {reason}")]
    Load { path: PathBuf, reason: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Build a load error for `path`
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
