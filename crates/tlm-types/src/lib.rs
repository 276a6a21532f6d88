//! Foundation types for Timeline Merge (TLM).
//!
//! Every other TLM crate depends on `tlm-types`.
//!
//! # Key Types
//!
//! - [`Timestamp`] — Totally ordered record time (milliseconds + logical counter)
//! - [`SourceId`] — Position of a source in the caller-supplied source list
//! - [`Record`] — One timestamped, immutable unit of data

pub mod error;
pub mod record;
pub mod timestamp;

pub use error::TypeError;
pub use record::{Record, SourceId};
pub use timestamp::Timestamp;
