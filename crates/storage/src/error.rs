//! Storage error type: io/serde failures with path context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad JSON in {}", path.display())]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A journal line that does not parse; the line number is 1-based.
    #[error("bad record at {}:{line}", path.display())]
    BadRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> StorageError {
        let path = path.into();
        move |source| StorageError::Io { path, source }
    }

    pub(crate) fn serde(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> StorageError {
        let path = path.into();
        move |source| StorageError::Serde { path, source }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
