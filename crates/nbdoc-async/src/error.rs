use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Error from the blocking document layer, passed through unchanged so
    /// callers can discriminate schema violations from parse failures.
    #[error(transparent)]
    Document(#[from] nbdoc::Error),

    #[error("Unsupported handle: {0}")]
    UnsupportedHandle(String),

    #[error("No async scheduler is running on this thread")]
    NoSchedulerAvailable,

    #[error("Worker pool is saturated and configured to reject new work")]
    PoolSaturated,

    #[error("Failed to open {path}: {source}")]
    ResourceAcquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when this error is a schema violation from the validator.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Error::Document(nbdoc::Error::SchemaViolation { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
