use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the store layer.
///
/// Not-found conditions (unknown user, no search hit, empty undo stack) are
/// not errors; those operations return `Option`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The history file could not be opened, read or written.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to or reading from a caller-supplied stream failed.
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
