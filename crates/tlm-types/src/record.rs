use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Identifies a source by its position in the caller-supplied source list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub usize);

impl SourceId {
    /// Zero-based position of the source.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src#{}", self.0)
    }
}

/// One timestamped unit of data pulled from a source.
///
/// Records are immutable once produced. The payload is opaque to the merge
/// engines; only the timestamp takes part in ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// When the record was produced.
    pub timestamp: Timestamp,
    /// Opaque record body.
    pub payload: Bytes,
}

impl Record {
    /// Create a record from any byte-like payload.
    pub fn new(timestamp: impl Into<Timestamp>, payload: impl Into<Bytes>) -> Self {
        Self {
            timestamp: timestamp.into(),
            payload: payload.into(),
        }
    }

    /// A record with an empty payload, handy when only ordering matters.
    pub fn at(timestamp: impl Into<Timestamp>) -> Self {
        Self::new(timestamp, Bytes::new())
    }

    /// Payload as text, replacing invalid UTF-8 sequences.
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp.to_rfc3339(), self.payload_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_millis_and_str() {
        let record = Record::new(42u64, "disk full");
        assert_eq!(record.timestamp, Timestamp::from_millis(42));
        assert_eq!(record.payload_str(), "disk full");
        assert_eq!(record.len(), 9);
    }

    #[test]
    fn at_has_empty_payload() {
        let record = Record::at(Timestamp::new(1, 2));
        assert!(record.is_empty());
        assert_eq!(record.timestamp.logical, 2);
    }

    #[test]
    fn payload_str_is_lossy() {
        let record = Record::new(1u64, vec![0x66, 0x6f, 0xff]);
        assert_eq!(record.payload_str(), "fo\u{fffd}");
    }

    #[test]
    fn display_renders_time_then_payload() {
        let record = Record::new(1_709_294_400_250u64, "boot");
        assert_eq!(format!("{record}"), "2024-03-01T12:00:00.250Z boot");
    }

    #[test]
    fn source_id_display_and_order() {
        assert_eq!(format!("{}", SourceId(3)), "src#3");
        assert!(SourceId(1) < SourceId(2));
        assert_eq!(SourceId(9).index(), 9);
    }

    #[test]
    fn serde_roundtrip() {
        let record = Record::new(Timestamp::new(10, 1), "payload");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
