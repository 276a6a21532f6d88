use tracing::{trace, warn};

use tlm_source::{Sink, Source};
use tlm_types::{Record, SourceId};

use crate::error::{MergeError, MergeResult};
use crate::report::MergeReport;

/// Pull once from `source`, counting the call and tagging failures with `id`.
pub(crate) async fn pull<S: Source + ?Sized>(
    source: &mut S,
    id: SourceId,
    report: &mut MergeReport,
) -> MergeResult<Option<Record>> {
    report.pulls += 1;
    match source.pull().await {
        Ok(Some(record)) => Ok(Some(record)),
        Ok(None) => {
            report.exhausted += 1;
            trace!(source = %id, "source exhausted");
            Ok(None)
        }
        Err(error) => {
            warn!(source = %id, %error, "source pull failed");
            Err(MergeError::Source { id, error })
        }
    }
}

/// Hand `record` to the sink.
pub(crate) async fn emit<K: Sink + ?Sized>(
    sink: &mut K,
    record: Record,
    report: &mut MergeReport,
) -> MergeResult<()> {
    trace!(timestamp = %record.timestamp, "emit");
    if let Err(error) = sink.emit(record).await {
        warn!(%error, emitted = report.emitted, "sink rejected record");
        return Err(error.into());
    }
    report.emitted += 1;
    Ok(())
}

/// Send the completion signal.
pub(crate) async fn complete<K: Sink + ?Sized>(sink: &mut K) -> MergeResult<()> {
    if let Err(error) = sink.complete().await {
        warn!(%error, "sink rejected completion");
        return Err(error.into());
    }
    Ok(())
}
