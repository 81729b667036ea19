//! Error types for the claquete-core library.

use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors surfaced by the encoding core. One typed failure per job; the
/// caller decides whether to retry with a fresh job.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The inspection tool errored or returned output we could not parse.
    #[error("probe failed for {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    /// The input has no video track.
    #[error("no video stream found in {0}")]
    NoVideoStream(String),

    /// A caller-supplied value is outside its recognized domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The external binary could not be launched at all.
    #[error("failed to start {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The encoder ran but exited non-zero.
    #[error("{tool} exited with {status}: {stderr}")]
    EncodeFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The job was aborted through its cancellation token.
    #[error("job cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    PathError(String),
}

/// Result type for claquete-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `ProbeFailed` error for the given input path.
pub(crate) fn probe_failed(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::ProbeFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}
