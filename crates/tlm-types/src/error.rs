use thiserror::Error;

/// Errors produced by type conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("timestamp before UNIX epoch: {0}")]
    BeforeEpoch(String),

    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    InvalidRfc3339 { input: String, reason: String },

    #[error("timestamp {0}ms is outside the representable calendar range")]
    OutOfRange(u64),
}
