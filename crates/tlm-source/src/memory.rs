use std::collections::VecDeque;

use async_trait::async_trait;
use tlm_types::{Record, Timestamp};

use crate::error::{SinkError, SinkResult, SourceResult};
use crate::traits::{Sink, Source};

/// In-memory source for tests, local demos, and embedding.
///
/// Tracks how often it was pulled so callers holding a `&mut VecSource` can
/// check that an exhausted source is never polled again.
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    records: VecDeque<Record>,
    pulls: usize,
    pulls_after_exhausted: usize,
    exhausted: bool,
}

impl VecSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
            ..Default::default()
        }
    }

    /// A source that is exhausted from the start.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records with empty payloads at the given millisecond timestamps.
    pub fn from_millis(millis: impl IntoIterator<Item = u64>) -> Self {
        Self::new(millis.into_iter().map(Record::at).collect())
    }

    /// Total number of `pull` calls, including those that returned nothing.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    /// Number of `pull` calls made after the first empty pull.
    pub fn pulls_after_exhausted(&self) -> usize {
        self.pulls_after_exhausted
    }

    /// Records not yet pulled.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl Source for VecSource {
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        self.pulls += 1;
        if self.exhausted {
            self.pulls_after_exhausted += 1;
            return Ok(None);
        }
        let next = self.records.pop_front();
        if next.is_none() {
            self.exhausted = true;
        }
        Ok(next)
    }
}

/// In-memory sink that collects every emitted record.
///
/// Rejects any call made after `complete` with [`SinkError::Closed`].
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    records: Vec<Record>,
    complete: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in emission order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Millisecond component of every received timestamp, in order.
    pub fn timestamps(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.timestamp.millis).collect()
    }

    /// Returns `true` once `complete` has been received.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns `true` if the received timestamps never decrease.
    pub fn is_ordered(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Latest timestamp received, if any.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.records.last().map(|r| r.timestamp)
    }
}

#[async_trait]
impl Sink for VecSink {
    async fn emit(&mut self, record: Record) -> SinkResult<()> {
        if self.complete {
            return Err(SinkError::Closed);
        }
        self.records.push(record);
        Ok(())
    }

    async fn complete(&mut self) -> SinkResult<()> {
        if self.complete {
            return Err(SinkError::Closed);
        }
        self.complete = true;
        Ok(())
    }
}
