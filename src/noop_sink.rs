use crate::context::RequestContext;
use crate::record::{Level, Record};
use crate::sink::LogSink;
use crate::value::Attr;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of the enrichment layer itself
/// without any I/O, and as the stand-in behind
/// [`default_logger`](crate::logger::default_logger) before a real
/// logger is installed.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    async fn handle(
        &self,
        _cx: &RequestContext,
        _record: Record,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn LogSink> {
        Arc::new(NoopSink)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn LogSink> {
        Arc::new(NoopSink)
    }
}
