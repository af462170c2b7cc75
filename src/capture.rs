use crate::context::RequestContext;
use crate::record::{Level, Record};
use crate::sink::LogSink;
use crate::value::{Attr, Value};
use async_trait::async_trait;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// A sink that retains every record in memory.
///
/// Accepts all levels and never fails. Clones share the same backing
/// store, so a test can keep one handle and hand another to the logger
/// under test.
#[derive(Clone, Default)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<Record>>>,
    bound_attrs: Vec<Attr>,
    groups: Vec<String>,
}

impl CaptureSink {
    pub fn new() -> CaptureSink {
        CaptureSink::default()
    }

    /// Snapshot of everything captured so far, in emission order.
    pub fn records(&self) -> Vec<Record> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LogSink for CaptureSink {
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    async fn handle(
        &self,
        _cx: &RequestContext,
        record: Record,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let Record { timestamp, level, message, attrs: caller_attrs } = record;
        let mut attrs = self.bound_attrs.clone();
        attrs.extend(caller_attrs);
        for name in self.groups.iter().rev() {
            attrs = vec![Attr {
                key: name.clone(),
                value: Value::Group(attrs),
            }];
        }
        let stored = Record { timestamp, level, message, attrs };
        match self.records.lock() {
            Ok(mut guard) => guard.push(stored),
            Err(poisoned) => poisoned.into_inner().push(stored),
        }
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn LogSink> {
        let mut derived = self.clone();
        derived.bound_attrs.extend(attrs);
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn LogSink> {
        let mut derived = self.clone();
        derived.groups.push(name.to_string());
        Arc::new(derived)
    }
}
