use crate::context::RequestContext;
use crate::record::{Level, Record};
use crate::sink::LogSink;
use crate::value::Attr;
use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Configuration for [`JsonSink`].
///
/// **Fields**
/// - `min_level`: records below this severity are rejected by
///   [`enabled`](LogSink::enabled) and never written.
#[derive(Clone, Debug)]
pub struct JsonSinkConfig {
    pub min_level: Level,
}

impl Default for JsonSinkConfig {
    fn default() -> Self {
        JsonSinkConfig { min_level: Level::Info }
    }
}

#[derive(Clone, Debug)]
enum PrefixItem {
    Attr(Attr),
    Group(String),
}

/// Terminal [`LogSink`] writing one JSON object per record.
///
/// Each line carries `time`, `level`, `msg` and then the record's
/// attributes in order, so anything a decorator appended (such as the
/// `meta_information` group) lands after the caller-supplied fields.
/// Derived sinks from [`with_attrs`](LogSink::with_attrs) and
/// [`with_group`](LogSink::with_group) share the writer; attributes
/// bound after a group was opened nest under that group, matching the
/// usual structured-handler semantics.
#[derive(Clone)]
pub struct JsonSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    min_level: Level,
    prefix: Vec<PrefixItem>,
}

impl JsonSink {
    /// Construct a sink writing to `writer` with the default config.
    pub fn new(writer: impl Write + Send + 'static) -> JsonSink {
        JsonSink::with_config(writer, JsonSinkConfig::default())
    }

    /// Construct a sink writing to `writer` using `config`.
    pub fn with_config(writer: impl Write + Send + 'static, config: JsonSinkConfig) -> JsonSink {
        JsonSink {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            min_level: config.min_level,
            prefix: Vec::new(),
        }
    }

    /// Convenience constructor targeting standard output.
    pub fn stdout(config: JsonSinkConfig) -> JsonSink {
        JsonSink::with_config(std::io::stdout(), config)
    }

    fn lock_writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn render(&self, record: &Record) -> JsonValue {
        let mut root = Map::new();
        root.insert("time".to_string(), json!(record.timestamp.to_rfc3339()));
        root.insert("level".to_string(), json!(record.level.as_str()));
        root.insert("msg".to_string(), json!(record.message));

        // Replay the derivation prefix: attributes belong to whatever
        // group was open when they were bound.
        let mut group_names: Vec<&str> = Vec::new();
        let mut attrs_by_depth: Vec<Vec<&Attr>> = vec![Vec::new()];
        for item in &self.prefix {
            match item {
                PrefixItem::Attr(attr) => {
                    if let Some(scope) = attrs_by_depth.last_mut() {
                        scope.push(attr);
                    }
                }
                PrefixItem::Group(name) => {
                    group_names.push(name);
                    attrs_by_depth.push(Vec::new());
                }
            }
        }
        if let Some(innermost) = attrs_by_depth.last_mut() {
            innermost.extend(record.attrs.iter());
        }

        // Fold innermost group outward; empty groups are elided.
        let mut nested: Option<(String, Map<String, JsonValue>)> = None;
        for depth in (0..attrs_by_depth.len()).rev() {
            let mut scope = Map::new();
            for attr in &attrs_by_depth[depth] {
                scope.insert(attr.key.clone(), attr.value.to_json());
            }
            if let Some((name, inner)) = nested.take() {
                if !inner.is_empty() {
                    scope.insert(name, JsonValue::Object(inner));
                }
            }
            if depth == 0 {
                root.extend(scope);
            } else {
                nested = Some((group_names[depth - 1].to_string(), scope));
            }
        }

        JsonValue::Object(root)
    }
}

#[async_trait]
impl LogSink for JsonSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    async fn handle(
        &self,
        _cx: &RequestContext,
        record: Record,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let line = serde_json::to_string(&self.render(&record))?;
        let mut writer = self.lock_writer();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn LogSink> {
        let mut derived = self.clone();
        derived.prefix.extend(attrs.into_iter().map(PrefixItem::Attr));
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn LogSink> {
        let mut derived = self.clone();
        derived.prefix.push(PrefixItem::Group(name.to_string()));
        Arc::new(derived)
    }
}
