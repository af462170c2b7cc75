use crate::context::RequestContext;
use crate::record::{Level, Record};
use crate::value::Attr;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// Destination for [`Record`]s produced by the logging frontend.
///
/// Implementations are responsible for formatting and writing records
/// to a concrete backend (stdout, a file, the network). Decorators such
/// as [`EnrichingSink`](crate::enrich::EnrichingSink) also implement
/// this trait and wrap another sink.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Whether a record at `level` would be written at all.
    ///
    /// Minimum-severity filtering configured at sink construction is
    /// authoritative here; decorators must delegate this check
    /// unchanged rather than impose their own policy.
    fn enabled(&self, level: Level) -> bool;

    /// Format and write a single record.
    ///
    /// **Parameters**
    /// - `cx`: the request context active at the call site. Decorators
    ///   read metadata from it; terminal sinks may ignore it.
    /// - `record`: the record to emit, consumed by this call.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted by the backend.
    /// - `Err(..)` if the write failed (I/O error, serialization
    ///   error). Errors travel back to the log call site verbatim; no
    ///   layer in between adds retry policy.
    ///
    /// Must be safe for concurrent invocation: one sink instance is
    /// shared by every in-flight request.
    async fn handle(
        &self,
        cx: &RequestContext,
        record: Record,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Derive a sink that attaches `attrs` to every subsequent record.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn LogSink>;

    /// Derive a sink that nests subsequent attributes under `name`.
    fn with_group(&self, name: &str) -> Arc<dyn LogSink>;
}
