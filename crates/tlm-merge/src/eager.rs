use std::cmp::Ordering;

use tracing::{debug, info};

use tlm_source::{Sink, Source};
use tlm_types::{Record, SourceId};

use crate::error::MergeResult;
use crate::heap::MinHeap;
use crate::report::MergeReport;
use crate::step;

/// A record waiting in the heap together with the source it came from.
///
/// Ordered by `(timestamp, source)`; the payload takes no part.
struct Staged {
    record: Record,
    source: SourceId,
}

impl PartialEq for Staged {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Staged {}

impl PartialOrd for Staged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Staged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record
            .timestamp
            .cmp(&other.record.timestamp)
            .then(self.source.cmp(&other.source))
    }
}

/// Heap-based merge for sources whose pulls return promptly.
///
/// Every source is staged up front, so the heap holds up to one record per
/// source and each step costs `O(log k)`. After the minimum is emitted, the
/// same source keeps emitting directly while its next record is no later
/// than the heap minimum; only the record that breaks the run goes back into
/// the heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct EagerMerge;

impl EagerMerge {
    pub fn new() -> Self {
        Self
    }

    /// Merge `sources` into `sink`, then send `complete`.
    ///
    /// On error the merge stops at once, remaining sources are dropped
    /// unpulled, and `complete` is not sent.
    pub async fn merge<S, K>(&self, mut sources: Vec<S>, sink: &mut K) -> MergeResult<MergeReport>
    where
        S: Source,
        K: Sink + ?Sized,
    {
        let mut report = MergeReport::new(sources.len());
        let mut heap = MinHeap::with_capacity(sources.len());
        info!(sources = sources.len(), "eager merge started");

        for (index, source) in sources.iter_mut().enumerate() {
            let id = SourceId(index);
            if let Some(record) = step::pull(source, id, &mut report).await? {
                heap.push(Staged { record, source: id });
            } else {
                debug!(source = %id, "source empty at start");
            }
        }
        report.observe_active(heap.len());

        while let Some(Staged { record, source: id }) = heap.pop() {
            step::emit(sink, record, &mut report).await?;

            let source = &mut sources[id.index()];
            while let Some(next) = step::pull(source, id, &mut report).await? {
                let in_run = heap
                    .peek()
                    .map_or(true, |min| next.timestamp <= min.record.timestamp);
                if !in_run {
                    heap.push(Staged {
                        record: next,
                        source: id,
                    });
                    break;
                }
                step::emit(sink, next, &mut report).await?;
                report.batched += 1;
            }
        }

        step::complete(sink).await?;
        info!(
            emitted = report.emitted,
            batched = report.batched,
            pulls = report.pulls,
            "eager merge complete"
        );
        Ok(report)
    }
}
