//! Severity levels
//!
//! Levels are ordered from most to least severe: a lower ordinal means a more
//! severe message. A logger with verbosity `Warn` emits `Fatal` through `Warn`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Log level, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Fatal,
    Alert,
    Critical,
    Error,
    Warn,
    Notice,
    Info,
    Debug,
    NotSet,
}

impl LogLevel {
    /// Every level, in severity order
    pub const ALL: [LogLevel; 9] = [
        LogLevel::Fatal,
        LogLevel::Alert,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Notice,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::NotSet,
    ];

    /// The most verbose threshold, admitting every level
    pub const MOST_VERBOSE: LogLevel = LogLevel::NotSet;

    /// Get the display label for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "FATAL",
            LogLevel::Alert => "ALERT",
            LogLevel::Critical => "CRIT",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Notice => "NOTE",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::NotSet => "N/S",
        }
    }

    /// Check whether a message at `self` passes a `threshold`
    pub fn admitted_by(self, threshold: LogLevel) -> bool {
        self <= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working, e.g. `{:<5}`
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    /// Accepts level names and display labels, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(LogLevel::Fatal),
            "alert" => Ok(LogLevel::Alert),
            "critical" | "crit" => Ok(LogLevel::Critical),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "notice" | "note" => Ok(LogLevel::Notice),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "notset" | "not_set" | "n/s" => Ok(LogLevel::NotSet),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        LogLevel::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| Error::InvalidLevel(value.to_string()))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        format!("{:?}", level).to_ascii_lowercase()
    }
}
