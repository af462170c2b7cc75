use crate::value::Attr;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Severity of a [`Record`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned when parsing a [`Level`] from text.
#[derive(thiserror::Error, Debug)]
pub enum ParseLevelError {
    #[error("unknown log level: {0}")]
    Unknown(String),
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            other => Err(ParseLevelError::Unknown(other.to_string())),
        }
    }
}

/// One structured log event.
///
/// Constructed by the logging frontend per call, consumed exactly once
/// by the handler chain. The struct itself is not mutated after
/// construction; decorators that need to add attributes take the record
/// by value and use [`Record::with_attr`].
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>, attrs: Vec<Attr>) -> Record {
        Record {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            attrs,
        }
    }

    /// Return this record with one attribute appended after the
    /// existing sequence, so caller-supplied fields are not shadowed.
    pub fn with_attr(mut self, attr: Attr) -> Record {
        self.attrs.push(attr);
        self
    }
}
