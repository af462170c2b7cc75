use crate::context::RequestContext;
use crate::noop_sink::NoopSink;
use crate::record::{Level, Record};
use crate::sink::LogSink;
use crate::value::Attr;
use std::error::Error;
use std::sync::{Arc, OnceLock};

/// Logging frontend: level-tagged entry points over a [`LogSink`].
///
/// Each call builds a [`Record`] from the message and field pairs and
/// hands it to the installed sink chain, threading the caller's
/// [`RequestContext`] along. Cloning is cheap; clones share the sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Logger {
        Logger { sink }
    }

    /// Whether a record at `level` would be written by the sink chain.
    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Emit a record at an explicit level.
    ///
    /// Skips record construction entirely when the sink's level check
    /// rejects `level`. Whatever the sink returns — including a write
    /// failure — comes back to the caller unchanged.
    pub async fn log(
        &self,
        level: Level,
        cx: &RequestContext,
        message: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if !self.sink.enabled(level) {
            return Ok(());
        }
        self.sink.handle(cx, Record::new(level, message, attrs)).await
    }

    pub async fn debug(
        &self,
        cx: &RequestContext,
        message: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Debug, cx, message, attrs).await
    }

    pub async fn info(
        &self,
        cx: &RequestContext,
        message: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Info, cx, message, attrs).await
    }

    pub async fn warn(
        &self,
        cx: &RequestContext,
        message: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Warn, cx, message, attrs).await
    }

    pub async fn error(
        &self,
        cx: &RequestContext,
        message: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log(Level::Error, cx, message, attrs).await
    }

    /// Derive a logger pre-bound with static fields.
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Logger {
        Logger {
            sink: self.sink.with_attrs(attrs),
        }
    }

    /// Derive a logger whose subsequent fields nest under `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        Logger {
            sink: self.sink.with_group(name),
        }
    }
}

/// Error type returned when installing the process-wide default logger.
#[derive(thiserror::Error, Debug)]
pub enum DefaultLoggerError {
    #[error("default logger is already installed")]
    AlreadyInstalled,
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide default logger. Single initialization: a
/// second call fails and leaves the first installation in place.
pub fn set_default_logger(logger: Logger) -> Result<(), DefaultLoggerError> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| DefaultLoggerError::AlreadyInstalled)
}

/// The installed default logger, or a [`NoopSink`]-backed one if
/// nothing has been installed yet.
pub fn default_logger() -> Logger {
    DEFAULT_LOGGER
        .get()
        .cloned()
        .unwrap_or_else(|| Logger::new(Arc::new(NoopSink)))
}
