use std::iter::Enumerate;
use std::vec;

use tracing::{debug, info};

use tlm_source::{Sink, Source};
use tlm_types::{Record, SourceId};

use crate::config::MergeConfig;
use crate::error::MergeResult;
use crate::report::MergeReport;
use crate::step;

/// An admitted source and the record it has staged for comparison.
struct ActiveEntry<S> {
    id: SourceId,
    source: S,
    staged: Record,
}

/// Working set of one bounded merge.
///
/// Owns every source: admitted ones live in `active`, the rest wait in
/// `pending` in caller order. A source leaves the frontier for good once it
/// reports exhaustion and is dropped there, so it is never pulled again.
struct Frontier<S> {
    active: Vec<ActiveEntry<S>>,
    pending: Enumerate<vec::IntoIter<S>>,
}

impl<S: Source> Frontier<S> {
    fn new(sources: Vec<S>, capacity: usize) -> Self {
        Self {
            active: Vec::with_capacity(capacity.min(sources.len())),
            pending: sources.into_iter().enumerate(),
        }
    }

    fn len(&self) -> usize {
        self.active.len()
    }

    fn has_pending(&self) -> bool {
        self.pending.len() > 0
    }

    /// Probe the next pending source once. It joins the active set only if
    /// that first pull yields a record; either way it is not tried again.
    ///
    /// Returns `false` when no pending source was left.
    async fn admit_next(&mut self, report: &mut MergeReport) -> MergeResult<bool> {
        let Some((index, mut source)) = self.pending.next() else {
            return Ok(false);
        };
        let id = SourceId(index);
        match step::pull(&mut source, id, report).await? {
            Some(staged) => {
                debug!(source = %id, active = self.active.len() + 1, "source admitted");
                self.active.push(ActiveEntry { id, source, staged });
            }
            None => debug!(source = %id, "candidate empty, skipped"),
        }
        Ok(true)
    }

    /// Keep admitting while the active set is empty and sources remain, so
    /// a streak of empty candidates cannot strand the sources behind them.
    async fn refill(&mut self, report: &mut MergeReport) -> MergeResult<()> {
        while self.active.is_empty() && self.admit_next(report).await? {}
        Ok(())
    }

    /// Position of the staged record with the smallest `(timestamp, id)`.
    fn min_position(&self) -> Option<usize> {
        self.active
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| (entry.staged.timestamp, entry.id))
            .map(|(pos, _)| pos)
    }
}

/// Merge that keeps at most `active_set_capacity` sources staged.
///
/// Suited to very many sources, or sources whose pulls suspend on I/O. Each
/// step scans the active set linearly (`O(C)`), emits the minimum, and pulls
/// its replacement from the same source. When a source runs dry, exactly one
/// further source is admitted in caller order.
///
/// Ordering across the whole input is only guaranteed when every source
/// with overlapping time ranges is active at once; a source admitted late
/// cannot reorder records that were already emitted.
#[derive(Clone, Debug)]
pub struct BoundedMerge {
    config: MergeConfig,
}

impl BoundedMerge {
    /// Create an engine, rejecting a zero capacity.
    pub fn new(config: MergeConfig) -> MergeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_capacity(active_set_capacity: usize) -> MergeResult<Self> {
        Self::new(MergeConfig::with_capacity(active_set_capacity))
    }

    pub fn capacity(&self) -> usize {
        self.config.active_set_capacity
    }

    /// Merge `sources` into `sink`, then send `complete`.
    ///
    /// Pulls are issued one at a time even though each may suspend. On error
    /// the merge stops at once, staged and pending sources are dropped
    /// unpulled, and `complete` is not sent.
    pub async fn merge<S, K>(&self, sources: Vec<S>, sink: &mut K) -> MergeResult<MergeReport>
    where
        S: Source,
        K: Sink + ?Sized,
    {
        let capacity = self.capacity();
        let mut report = MergeReport::new(sources.len());
        let mut frontier = Frontier::new(sources, capacity);
        info!(sources = report.sources, capacity, "bounded merge started");

        for _ in 0..capacity {
            if !frontier.admit_next(&mut report).await? {
                break;
            }
        }
        frontier.refill(&mut report).await?;
        report.observe_active(frontier.len());

        while let Some(pos) = frontier.min_position() {
            let ActiveEntry { id, mut source, staged } = frontier.active.swap_remove(pos);
            step::emit(sink, staged, &mut report).await?;

            match step::pull(&mut source, id, &mut report).await? {
                Some(staged) => frontier.active.push(ActiveEntry { id, source, staged }),
                None => {
                    drop(source);
                    frontier.admit_next(&mut report).await?;
                    frontier.refill(&mut report).await?;
                    report.observe_active(frontier.len());
                }
            }
        }
        debug_assert!(!frontier.has_pending());

        step::complete(sink).await?;
        info!(
            emitted = report.emitted,
            pulls = report.pulls,
            peak_active = report.peak_active,
            "bounded merge complete"
        );
        Ok(report)
    }
}
