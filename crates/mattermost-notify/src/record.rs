//! Log record and severity level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered severity level, higher = more severe.
///
/// Uses the conventional 100..=600 scale so integer thresholds from
/// configuration compare directly against record levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u32);

impl Level {
    pub const DEBUG: Self = Self(100);
    pub const INFO: Self = Self(200);
    pub const NOTICE: Self = Self(250);
    pub const WARNING: Self = Self(300);
    pub const ERROR: Self = Self(400);
    pub const CRITICAL: Self = Self(500);
    pub const ALERT: Self = Self(550);
    pub const EMERGENCY: Self = Self(600);

    /// Get display name for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            100 => "DEBUG",
            200 => "INFO",
            250 => "NOTICE",
            300 => "WARNING",
            400 => "ERROR",
            500 => "CRITICAL",
            550 => "ALERT",
            600 => "EMERGENCY",
            _ => "LOG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log event handed to the notifier by the host logging
/// framework. The notifier only reads these fields; it never mutates or
/// persists a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity of the event.
    pub level: Level,
    /// Short human-readable message.
    pub message: String,
    /// When the event occurred.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// The fully rendered record as produced by the host's formatter.
    #[serde(default)]
    pub formatted: String,
}

impl LogRecord {
    /// Create a record timestamped now, with a plain default rendering
    /// for hosts that do not supply one.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        let message = message.into();
        let formatted = format!("[{level}] {message}");
        Self {
            level,
            message,
            timestamp: Utc::now(),
            formatted,
        }
    }

    /// Replace the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Replace the rendered content.
    #[must_use]
    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = formatted.into();
        self
    }
}
