use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Point in time at which a record was produced.
///
/// Combines a wall-clock component with a logical counter so that records
/// sharing the same millisecond can still be ordered by their producer.
///
/// Ordering: `millis` → `logical` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub millis: u64,
    /// Logical counter for records within the same millisecond.
    #[serde(default)]
    pub logical: u32,
}

impl Timestamp {
    /// Create a timestamp with explicit values.
    pub const fn new(millis: u64, logical: u32) -> Self {
        Self { millis, logical }
    }

    /// Create a timestamp at a whole millisecond.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis, logical: 0 }
    }

    /// Timestamp for the current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self::from_millis(millis)
    }

    /// Convert a calendar time. Sub-millisecond precision is truncated.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, TypeError> {
        let millis = dt.timestamp_millis();
        if millis < 0 {
            return Err(TypeError::BeforeEpoch(dt.to_rfc3339()));
        }
        Ok(Self::from_millis(millis as u64))
    }

    /// Calendar time of the wall-clock component.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, TypeError> {
        i64::try_from(self.millis)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or(TypeError::OutOfRange(self.millis))
    }

    /// Parse an RFC 3339 string such as `2024-03-01T12:00:00.250Z`.
    pub fn parse_rfc3339(input: &str) -> Result<Self, TypeError> {
        let dt = DateTime::parse_from_rfc3339(input).map_err(|e| TypeError::InvalidRfc3339 {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_datetime(dt.with_timezone(&Utc))
    }

    /// RFC 3339 rendering with millisecond precision, or the raw millisecond
    /// count when the value lies outside the calendar range.
    pub fn to_rfc3339(&self) -> String {
        match self.to_datetime() {
            Ok(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Err(_) => format!("{}ms", self.millis),
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.millis
            .cmp(&other.millis)
            .then(self.logical.cmp(&other.logical))
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self::from_millis(millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms.{})", self.millis, self.logical)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.millis, self.logical)
    }
}
