use crate::context::{
    RequestContext, CORRELATION_ID_KEY, REQUEST_METHOD_KEY, REQUEST_PATH_KEY,
    REQUEST_USER_AGENT_KEY,
};
use crate::record::{Level, Record};
use crate::sink::LogSink;
use crate::value::{Attr, Value};
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// Attribute key under which the request metadata group is injected.
pub const META_GROUP_KEY: &str = "meta_information";

/// Decorator that enriches every record with request-scoped metadata.
///
/// Wraps an arbitrary [`LogSink`] and, on every [`handle`](LogSink::handle)
/// call, reads the four metadata keys from the [`RequestContext`] and
/// appends one nested `meta_information` group before delegating to the
/// inner sink. The group is always present, with empty-string fields
/// for whatever the middleware chain has not populated yet.
///
/// The decorator holds no per-request state, so a single instance is
/// shared safely by all in-flight requests.
pub struct EnrichingSink {
    inner: Arc<dyn LogSink>,
}

impl EnrichingSink {
    /// Wrap `inner`, which remains responsible for formatting, writing
    /// and severity filtering.
    pub fn new(inner: Arc<dyn LogSink>) -> EnrichingSink {
        EnrichingSink { inner }
    }

    fn metadata_group(cx: &RequestContext) -> Value {
        Value::group(vec![
            Attr::new(CORRELATION_ID_KEY, cx.get_str(CORRELATION_ID_KEY)),
            Attr::new(REQUEST_METHOD_KEY, cx.get_str(REQUEST_METHOD_KEY)),
            Attr::new(REQUEST_PATH_KEY, cx.get_str(REQUEST_PATH_KEY)),
            Attr::new(REQUEST_USER_AGENT_KEY, cx.get_str(REQUEST_USER_AGENT_KEY)),
        ])
    }
}

#[async_trait]
impl LogSink for EnrichingSink {
    fn enabled(&self, level: Level) -> bool {
        // The wrapped sink's filtering policy stays authoritative.
        self.inner.enabled(level)
    }

    async fn handle(
        &self,
        cx: &RequestContext,
        record: Record,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let record = record.with_attr(Attr {
            key: META_GROUP_KEY.to_string(),
            value: Self::metadata_group(cx),
        });
        self.inner.handle(cx, record).await
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn LogSink> {
        // Re-wrap the derived inner sink so enrichment survives
        // derivation; returning the bare inner result would lose it.
        Arc::new(EnrichingSink {
            inner: self.inner.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn LogSink> {
        Arc::new(EnrichingSink {
            inner: self.inner.with_group(name),
        })
    }
}
