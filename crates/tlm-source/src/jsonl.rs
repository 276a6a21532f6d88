use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use tlm_types::{Record, Timestamp};

use crate::error::{SourceError, SourceResult};
use crate::traits::Source;

/// Time field of a JSON line: either epoch milliseconds or RFC 3339 text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineTime {
    Millis(u64),
    Text(String),
}

/// Wire shape of one JSON line.
///
/// ```json
/// {"timestamp": "2024-03-01T12:00:00.250Z", "payload": "disk full"}
/// {"timestamp": 1709294400250, "logical": 1, "payload": "retrying"}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub timestamp: LineTime,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub logical: u32,
    #[serde(default)]
    pub payload: String,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl LineRecord {
    /// Encode a record as a JSON line using an RFC 3339 time field.
    pub fn from_record(record: &Record) -> Self {
        Self {
            timestamp: LineTime::Text(record.timestamp.to_rfc3339()),
            logical: record.timestamp.logical,
            payload: record.payload_str().into_owned(),
        }
    }

    fn into_record(self, line: u64) -> SourceResult<Record> {
        let base = match self.timestamp {
            LineTime::Millis(ms) => Timestamp::from_millis(ms),
            LineTime::Text(text) => {
                Timestamp::parse_rfc3339(&text).map_err(|e| SourceError::Parse {
                    line,
                    reason: e.to_string(),
                })?
            }
        };
        Ok(Record::new(
            Timestamp::new(base.millis, self.logical),
            self.payload,
        ))
    }
}

/// Source reading newline-delimited JSON records from an async reader.
///
/// Blank lines are skipped. A malformed line fails the pull with
/// [`SourceError::Parse`] carrying its 1-based line number.
pub struct JsonLinesSource<R> {
    reader: R,
    buf: String,
    line: u64,
    done: bool,
}

impl<R> JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON-lines file.
    pub async fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        debug!(path = %path.display(), "opened json-lines source");
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R> Source for JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        while !self.done {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).await?;
            if read == 0 {
                self.done = true;
                break;
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            let parsed: LineRecord =
                serde_json::from_str(text).map_err(|e| SourceError::Parse {
                    line: self.line,
                    reason: e.to_string(),
                })?;
            return parsed.into_record(self.line).map(Some);
        }
        Ok(None)
    }
}

/// JSON-lines file that is opened on its first pull.
///
/// Lets a bounded merge hold thousands of files while only the admitted
/// ones have a descriptor open. The handle is closed as soon as the file is
/// exhausted.
pub struct JsonLinesFile {
    path: PathBuf,
    state: FileState,
}

enum FileState {
    Unopened,
    Open(JsonLinesSource<BufReader<File>>),
    Drained,
}

impl JsonLinesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: FileState::Unopened,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while a descriptor is held.
    pub fn is_open(&self) -> bool {
        matches!(self.state, FileState::Open(_))
    }
}

#[async_trait]
impl Source for JsonLinesFile {
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        if let FileState::Unopened = self.state {
            self.state = FileState::Open(JsonLinesSource::open(&self.path).await?);
        }
        let FileState::Open(source) = &mut self.state else {
            return Ok(None);
        };
        let next = source.pull().await?;
        if next.is_none() {
            debug!(path = %self.path.display(), lines = source.line(), "json-lines file drained");
            self.state = FileState::Drained;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source(text: &'static str) -> JsonLinesSource<&'static [u8]> {
        JsonLinesSource::new(text.as_bytes())
    }

    #[tokio::test]
    async fn parses_millis_and_rfc3339() {
        let mut src = source(concat!(
            "{\"timestamp\": 5, \"payload\": \"a\"}\n",
            "\n",
            "{\"timestamp\": \"2024-03-01T12:00:00.250Z\", \"logical\": 2, \"payload\": \"b\"}\n",
        ));

        let first = src.pull().await.unwrap().unwrap();
        assert_eq!(first.timestamp, Timestamp::from_millis(5));
        assert_eq!(first.payload_str(), "a");

        let second = src.pull().await.unwrap().unwrap();
        assert_eq!(second.timestamp, Timestamp::new(1_709_294_400_250, 2));
        assert_eq!(src.line(), 3);

        assert!(src.pull().await.unwrap().is_none());
        assert!(src.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_trailing_newline_is_fine() {
        let mut src = source("{\"timestamp\": 1}");
        let record = src.pull().await.unwrap().unwrap();
        assert!(record.is_empty());
        assert!(src.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_line_reports_line_number() {
        let mut src = source("{\"timestamp\": 1}\nnot json\n");
        src.pull().await.unwrap();
        match src.pull().await {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_rfc3339_is_a_parse_error() {
        let mut src = source("{\"timestamp\": \"noon\"}\n");
        assert!(matches!(
            src.pull().await,
            Err(SourceError::Parse { line: 1, .. })
        ));
    }

    #[tokio::test]
    async fn open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let record = Record::new(Timestamp::new(1_000, 3), "from disk");
        let line = serde_json::to_string(&LineRecord::from_record(&record)).unwrap();
        writeln!(file, "{line}").unwrap();

        let mut src = JsonLinesSource::open(file.path()).await.unwrap();
        assert_eq!(src.pull().await.unwrap(), Some(record));
        assert!(src.pull().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lazy_file_opens_on_first_pull_and_closes_when_drained() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"timestamp\": 1, \"payload\": \"x\"}}").unwrap();

        let mut src = JsonLinesFile::new(file.path());
        assert!(!src.is_open());
        assert!(src.pull().await.unwrap().is_some());
        assert!(src.is_open());
        assert!(src.pull().await.unwrap().is_none());
        assert!(!src.is_open());
        assert!(src.pull().await.unwrap().is_none());
        assert_eq!(src.path(), file.path());
    }

    #[tokio::test]
    async fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonLinesSource::open(dir.path().join("absent.jsonl"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
