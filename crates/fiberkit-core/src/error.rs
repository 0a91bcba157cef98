use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the I/O-facing parts of the toolkit.
///
/// The calculators themselves are total and never return this type.
#[derive(Debug, Error)]
pub enum FiberError {
    /// A file the caller pointed at could not be read. Not transient,
    /// callers should report it rather than retry.
    #[error("input resource unavailable: {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace contains no events")]
    EmptyTrace,
}

pub type FiberResult<T> = Result<T, FiberError>;

impl FiberError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FiberError::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }
}
