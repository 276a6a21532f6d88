use async_trait::async_trait;
use tlm_types::Record;

use crate::error::{SinkResult, SourceResult};

/// A lazy, finite, time-ordered sequence of records.
///
/// All implementations must satisfy these invariants:
/// - Records are yielded in non-decreasing timestamp order. This is assumed
///   by the merge engines and never checked by them.
/// - Once `pull` returns `Ok(None)` the source is exhausted and must keep
///   returning `Ok(None)` on every later call.
/// - A source is owned and pulled by exactly one merge at a time; calls are
///   strictly sequential.
#[async_trait]
pub trait Source: Send {
    /// Pull the next record, suspending while it is fetched.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    /// Returns `Err` on I/O or decoding failure; the merge aborts.
    async fn pull(&mut self) -> SourceResult<Option<Record>>;
}

/// Destination for merged records.
///
/// The merge engines call `emit` exactly once per record, in merge order, and
/// `complete` exactly once after the last `emit`. Calls never overlap.
#[async_trait]
pub trait Sink: Send {
    /// Accept the next record in merge order.
    async fn emit(&mut self, record: Record) -> SinkResult<()>;

    /// Signal that no further records will be emitted.
    async fn complete(&mut self) -> SinkResult<()>;
}

#[async_trait]
impl<'a, S: Source + ?Sized> Source for &'a mut S {
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        (**self).pull().await
    }
}

#[async_trait]
impl<S: Source + ?Sized> Source for Box<S> {
    async fn pull(&mut self) -> SourceResult<Option<Record>> {
        (**self).pull().await
    }
}

#[async_trait]
impl<'a, K: Sink + ?Sized> Sink for &'a mut K {
    async fn emit(&mut self, record: Record) -> SinkResult<()> {
        (**self).emit(record).await
    }

    async fn complete(&mut self) -> SinkResult<()> {
        (**self).complete().await
    }
}

#[async_trait]
impl<K: Sink + ?Sized> Sink for Box<K> {
    async fn emit(&mut self, record: Record) -> SinkResult<()> {
        (**self).emit(record).await
    }

    async fn complete(&mut self) -> SinkResult<()> {
        (**self).complete().await
    }
}
