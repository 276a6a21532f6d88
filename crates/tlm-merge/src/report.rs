use serde::{Deserialize, Serialize};

/// Counters describing one completed merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Sources supplied by the caller.
    pub sources: usize,
    /// Records delivered to the sink.
    pub emitted: u64,
    /// Pull calls issued, including the empty pull that ends each source.
    pub pulls: u64,
    /// Records the eager engine emitted without consulting its heap.
    pub batched: u64,
    /// Largest number of sources staged at the same time.
    pub peak_active: usize,
    /// Sources that reported exhaustion.
    pub exhausted: usize,
}

impl MergeReport {
    pub fn new(sources: usize) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    pub(crate) fn observe_active(&mut self, active: usize) {
        self.peak_active = self.peak_active.max(active);
    }
}
