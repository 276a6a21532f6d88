use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};

use tlm_types::Record;

use crate::error::{SinkError, SinkResult};
use crate::traits::Sink;

/// Sink writing one `<RFC 3339 time> <payload>` line per record.
///
/// Output is flushed on `complete`; wrap the writer in a [`BufWriter`] for
/// anything unbuffered.
pub struct WriterSink<W> {
    writer: W,
    line: String,
    closed: bool,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line: String::new(),
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<Stdout>> {
    /// Buffered sink over the process's standard output.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(tokio::io::stdout()))
    }
}

#[async_trait]
impl<W> Sink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn emit(&mut self, record: Record) -> SinkResult<()> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.line.clear();
        self.line.push_str(&record.to_string());
        self.line.push('\n');
        self.writer.write_all(self.line.as_bytes()).await?;
        Ok(())
    }

    async fn complete(&mut self) -> SinkResult<()> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.closed = true;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_one_line_per_record() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit(Record::new(0u64, "first")).await.unwrap();
        sink.emit(Record::new(1_500u64, "second")).await.unwrap();
        sink.complete().await.unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "1970-01-01T00:00:00.000Z first\n1970-01-01T00:00:01.500Z second\n"
        );
    }

    #[tokio::test]
    async fn closed_after_complete() {
        let mut sink = WriterSink::new(Vec::new());
        sink.complete().await.unwrap();
        assert!(matches!(
            sink.emit(Record::at(1u64)).await,
            Err(SinkError::Closed)
        ));
    }
}
