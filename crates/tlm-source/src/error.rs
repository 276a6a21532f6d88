use std::io;

use tlm_types::Timestamp;

/// Errors raised while pulling from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error from the underlying reader or transport.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be decoded.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// Adapter-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Errors raised by a sink while accepting records.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// I/O error from the underlying writer.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A record arrived earlier than its predecessor.
    #[error("record at {current} emitted after {previous}")]
    OutOfOrder {
        previous: Timestamp,
        current: Timestamp,
    },

    /// The sink already received its completion signal.
    #[error("sink is closed")]
    Closed,

    /// Adapter-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;
