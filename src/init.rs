use crate::enrich::EnrichingSink;
use crate::json_sink::{JsonSink, JsonSinkConfig};
use crate::logger::{set_default_logger, DefaultLoggerError, Logger};
use crate::sink::LogSink;
use std::sync::Arc;

/// Wrap `sink` in an [`EnrichingSink`] and install the result as the
/// process-wide default logger.
///
/// **Parameters**
/// - `sink`: the underlying sink that will format and write records.
///   Its severity filtering stays authoritative.
///
/// **Returns**
/// - The installed [`Logger`], also reachable afterwards through
///   [`default_logger`](crate::logger::default_logger).
/// - [`DefaultLoggerError::AlreadyInstalled`] if a default logger was
///   installed earlier; installation happens once at startup.
pub fn install(sink: Arc<dyn LogSink>) -> Result<Logger, DefaultLoggerError> {
    let logger = Logger::new(Arc::new(EnrichingSink::new(sink)));
    set_default_logger(logger.clone())?;
    Ok(logger)
}

/// Install an enriched JSON-lines logger writing to standard output.
///
/// Equivalent to building a [`JsonSink`] with `config` and passing it
/// to [`install`]. This is the recommended entrypoint for typical
/// services.
pub fn install_stdout(config: JsonSinkConfig) -> Result<Logger, DefaultLoggerError> {
    install(Arc::new(JsonSink::stdout(config)))
}
