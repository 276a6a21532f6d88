use tlm_source::{SinkError, SourceError};
use tlm_types::SourceId;

/// Errors that abort a merge. No `complete` is sent once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A pull failed; the source is not retried.
    #[error("source {id} failed: {error}")]
    Source {
        id: SourceId,
        #[source]
        error: SourceError,
    },

    /// The sink rejected an `emit` or `complete` call.
    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),

    /// The active-set capacity must be at least one.
    #[error("active-set capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// An engine name that is neither `eager` nor `bounded`.
    #[error("unknown merge engine {0:?} (expected \"eager\" or \"bounded\")")]
    UnknownEngine(String),
}

/// Result alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;
