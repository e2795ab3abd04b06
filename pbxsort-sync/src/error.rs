//! Error types for pbxsort-sync.

use std::path::PathBuf;

use thiserror::Error;

use pbxsort_core::{ConfigError, EngineError};
use pbxsort_detector::DetectError;

/// All errors that can arise from sorting project files.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The engine rejected the project file.
    #[error("{path}: {source}")]
    Engine {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// Project discovery failed.
    #[error("discovery error: {0}")]
    Detect(#[from] DetectError),

    /// The configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
