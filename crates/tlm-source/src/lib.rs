//! Collaborator capabilities consumed by the Timeline Merge engines.
//!
//! Provides:
//! - `Source` / `Sink` trait boundaries
//! - `VecSource` / `VecSink` in-memory adapters for tests and embedding
//! - `JsonLinesSource` for newline-delimited JSON over any async reader
//! - `SyntheticSource` for seeded, time-ordered demo traffic
//! - `WriterSink` and the order-verifying `StatsSink` wrapper

pub mod error;
pub mod jsonl;
pub mod memory;
pub mod stats;
pub mod synthetic;
pub mod traits;
pub mod writer;

pub use error::{SinkError, SinkResult, SourceError, SourceResult};
pub use jsonl::{JsonLinesFile, JsonLinesSource, LineRecord, LineTime};
pub use memory::{VecSink, VecSource};
pub use stats::{SinkStats, StatsSink};
pub use synthetic::{SyntheticConfig, SyntheticSource};
pub use traits::{Sink, Source};
pub use writer::WriterSink;
