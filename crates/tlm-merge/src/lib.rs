//! Merge engines for Timeline Merge (TLM).
//!
//! Both engines turn many independently time-ordered sources into one
//! time-ordered stream delivered to a sink, record by record:
//!
//! - [`EagerMerge`] seeds a binary min-heap with one record per source and
//!   drains it, emitting runs from the same source without touching the heap
//!   while they stay at or below the heap minimum.
//! - [`BoundedMerge`] keeps at most `active_set_capacity` sources staged,
//!   scans them linearly for the minimum, and admits further sources only as
//!   active ones run dry.
//!
//! Neither engine spawns tasks or pulls two sources at once; every pull is an
//! `await` point and the sink sees strictly sequential calls.

pub mod bounded;
pub mod config;
pub mod eager;
pub mod engine;
pub mod error;
pub mod heap;
pub mod report;
mod step;

pub use bounded::BoundedMerge;
pub use config::{MergeConfig, DEFAULT_ACTIVE_SET_CAPACITY};
pub use eager::EagerMerge;
pub use engine::{merge, Engine};
pub use error::{MergeError, MergeResult};
pub use heap::MinHeap;
pub use report::MergeReport;
