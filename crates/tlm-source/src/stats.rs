use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};

use tlm_types::{Record, Timestamp};

use crate::error::{SinkError, SinkResult};
use crate::traits::Sink;

/// Counters collected by a [`StatsSink`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkStats {
    /// Records accepted.
    pub records: u64,
    /// Time from the first `emit` to `complete`.
    pub elapsed: Duration,
    /// Earliest timestamp seen.
    pub first: Option<Timestamp>,
    /// Latest timestamp seen.
    pub last: Option<Timestamp>,
}

impl SinkStats {
    /// Throughput over `elapsed`; zero when nothing was timed.
    pub fn records_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Wrapper sink that verifies merge order and measures throughput.
///
/// A record whose timestamp is earlier than its predecessor is rejected with
/// [`SinkError::OutOfOrder`] and never reaches the inner sink.
pub struct StatsSink<K> {
    inner: K,
    stats: SinkStats,
    started: Option<Instant>,
}

impl<K: Sink> StatsSink<K> {
    pub fn new(inner: K) -> Self {
        Self {
            inner,
            stats: SinkStats::default(),
            started: None,
        }
    }

    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }

    pub fn inner(&self) -> &K {
        &self.inner
    }

    pub fn into_parts(self) -> (K, SinkStats) {
        (self.inner, self.stats)
    }
}

#[async_trait]
impl<K: Sink> Sink for StatsSink<K> {
    async fn emit(&mut self, record: Record) -> SinkResult<()> {
        let current = record.timestamp;
        if let Some(previous) = self.stats.last {
            if current < previous {
                warn!(%previous, %current, "out-of-order record rejected");
                return Err(SinkError::OutOfOrder { previous, current });
            }
        }

        self.inner.emit(record).await?;

        let now = Instant::now();
        let started = *self.started.get_or_insert(now);
        self.stats.elapsed = now.duration_since(started);
        self.stats.first.get_or_insert(current);
        self.stats.last = Some(current);
        self.stats.records += 1;
        Ok(())
    }

    async fn complete(&mut self) -> SinkResult<()> {
        self.inner.complete().await?;
        if let Some(started) = self.started {
            self.stats.elapsed = started.elapsed();
        }
        info!(
            records = self.stats.records,
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            records_per_sec = self.stats.records_per_sec() as u64,
            "sink complete"
        );
        Ok(())
    }
}
