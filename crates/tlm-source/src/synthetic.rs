use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use tlm_types::{Record, Timestamp};

use crate::error::SourceResult;
use crate::traits::Source;

const PHRASES: &[&str] = &[
    "connection accepted",
    "connection reset by peer",
    "cache miss",
    "cache hit",
    "request completed",
    "request timed out",
    "retrying upstream call",
    "checkpoint written",
    "disk usage above threshold",
    "worker started",
    "worker stopped",
    "configuration reloaded",
];

/// Parameters for a [`SyntheticSource`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Number of records to produce before exhaustion.
    pub count: usize,
    /// Timestamp of the first record.
    pub start: Timestamp,
    /// Largest gap, in milliseconds, between consecutive records.
    pub max_gap_ms: u64,
    /// Simulated fetch latency applied to every pull.
    pub latency: Option<Duration>,
    /// RNG seed; equal seeds produce equal sequences.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            count: 100,
            start: Timestamp::from_millis(1_700_000_000_000),
            max_gap_ms: 60_000,
            latency: None,
            seed: 0,
        }
    }
}

/// Seeded generator of time-ordered log lines.
///
/// Produces `count` records whose timestamps start at `start` and advance by
/// a random `0..=max_gap_ms` milliseconds each, so records sharing a
/// millisecond are possible.
pub struct SyntheticSource {
    rng: StdRng,
    next: Timestamp,
    remaining: usize,
    produced: usize,
    max_gap_ms: u64,
    latency: Option<Duration>,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            next: config.start,
            remaining: config.count,
            produced: 0,
            max_gap_ms: config.max_gap_ms,
            latency: config.latency,
        }
    }

    /// Records still to be produced.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

#[async_trait]
impl Source for SyntheticSource {
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.remaining == 0 {
            return Ok(None);
        }

        let timestamp = self.next;
        let phrase = PHRASES[self.rng.gen_range(0..PHRASES.len())];
        let payload = Bytes::from(format!("#{} {}", self.produced, phrase));

        let gap = self.rng.gen_range(0..=self.max_gap_ms);
        self.next = Timestamp::from_millis(timestamp.millis.saturating_add(gap));
        self.remaining -= 1;
        self.produced += 1;

        Ok(Some(Record::new(timestamp, payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(mut source: SyntheticSource) -> Vec<Record> {
        let mut out = Vec::new();
        while let Some(record) = source.pull().await.unwrap() {
            out.push(record);
        }
        out
    }

    #[tokio::test]
    async fn produces_count_records_in_order() {
        let records = drain(SyntheticSource::new(SyntheticConfig {
            count: 250,
            ..Default::default()
        }))
        .await;

        assert_eq!(records.len(), 250);
        assert_eq!(records[0].timestamp, SyntheticConfig::default().start);
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(records[0].payload_str().starts_with("#0 "));
    }

    #[tokio::test]
    async fn same_seed_same_sequence() {
        let config = SyntheticConfig {
            count: 20,
            seed: 7,
            ..Default::default()
        };
        let a = drain(SyntheticSource::new(config.clone())).await;
        let b = drain(SyntheticSource::new(config)).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn zero_gap_keeps_timestamp() {
        let records = drain(SyntheticSource::new(SyntheticConfig {
            count: 5,
            max_gap_ms: 0,
            ..Default::default()
        }))
        .await;
        assert!(records.iter().all(|r| r.timestamp == records[0].timestamp));
    }

    #[tokio::test]
    async fn stays_empty_after_exhaustion() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            count: 1,
            ..Default::default()
        });
        assert!(source.pull().await.unwrap().is_some());
        assert_eq!(source.remaining(), 0);
        assert!(source.pull().await.unwrap().is_none());
        assert!(source.pull().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied_per_pull() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            count: 2,
            latency: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let started = tokio::time::Instant::now();
        source.pull().await.unwrap();
        source.pull().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
