use crate::value::{ToLogValue, Value};
use std::sync::Arc;

/// Context key under which the per-request correlation id is bound.
pub const CORRELATION_ID_KEY: &str = "correlation_id";
/// Context key for the HTTP method of the in-flight request.
pub const REQUEST_METHOD_KEY: &str = "request_method";
/// Context key for the full request target, query string included.
pub const REQUEST_PATH_KEY: &str = "request_path";
/// Context key for the `User-Agent` header of the in-flight request.
pub const REQUEST_USER_AGENT_KEY: &str = "request_user_agent";

/// Immutable, append-only key/value association scoped to one request.
///
/// [`put`](RequestContext::put) never mutates in place: it derives a new
/// context sharing the existing bindings, so concurrent readers of an
/// earlier snapshot are unaffected. Cloning is cheap (one `Arc` bump)
/// which is what lets the context ride along in request extensions.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    head: Option<Arc<Binding>>,
}

#[derive(Debug)]
struct Binding {
    key: String,
    value: Value,
    next: Option<Arc<Binding>>,
}

impl RequestContext {
    /// An empty context, as created at the start of request handling.
    pub fn new() -> RequestContext {
        RequestContext::default()
    }

    /// Derive a new context with `key` bound to `value`, preserving all
    /// prior bindings. The most recent binding for a key wins on read.
    pub fn put(&self, key: impl Into<String>, value: impl ToLogValue) -> RequestContext {
        RequestContext {
            head: Some(Arc::new(Binding {
                key: key.into(),
                value: value.to_log_value(),
                next: self.head.clone(),
            })),
        }
    }

    /// Look up the most recent binding for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut current = self.head.as_deref();
        while let Some(binding) = current {
            if binding.key == key {
                return Some(&binding.value);
            }
            current = binding.next.as_deref();
        }
        None
    }

    /// Typed accessor for string metadata.
    ///
    /// Returns `""` when the key is unbound *or* bound to a non-string
    /// value — never fails, so missing metadata degrades to blank
    /// fields rather than breaking logging.
    pub fn get_str(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => "",
        }
    }
}
