//! Severity levels that gate which records reach the file.

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so the logger can compare a record's level against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Development-time detail. The default threshold, so everything is written.
    #[default]
    Debug = 0,
    /// Normal operational milestones.
    Info = 1,
    /// Non-fatal anomalies that may need attention.
    Warn = 2,
    /// Failures of a single operation.
    Error = 3,
    /// Unrecoverable failures; the FATAL entry points terminate the process.
    Fatal = 4,
}

impl Level {
    /// Lowercase because config files use lowercase level strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Bracketed label written into every record header.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "[DEBUG]",
            Self::Info => "[INFO]",
            Self::Warn => "[WARN]",
            Self::Error => "[ERROR]",
            Self::Fatal => "[FATAL]",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Debug,
            Self::Info,
            Self::Warn,
            Self::Error,
            Self::Fatal,
        ]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "err" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(crate::Error::InvalidLevel(s.to_string())),
        }
    }
}

/// Numeric thresholds past FATAL are rejected rather than clamped.
impl TryFrom<u8> for Level {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self, crate::Error> {
        Self::all()
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| crate::Error::InvalidLevel(value.to_string()))
    }
}
