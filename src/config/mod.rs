//! Logger configuration: defaults, TOML loading and validation.
//!
//! Values are plain fields so callers can fill them in directly; zero values
//! mean "use the default", applied by [`Config::normalized`].

mod structs;

pub use structs::MailConfig;

use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PATH: &str = "logs/log.log";
/// 256 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 256 * 1024 * 1024;
pub const DEFAULT_MAX_STORAGE_DAYS: i64 = 60;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);

/// A completely empty TOML document yields a working file+console logger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active log file; backups and the sweep live in its directory.
    pub path: String,
    /// Initial threshold.
    #[serde(deserialize_with = "structs::level")]
    pub level: Level,
    /// Rotation threshold in bytes.
    #[serde(deserialize_with = "structs::size")]
    pub max_size: u64,
    /// Retention window for rotated files; negative disables the sweep.
    pub max_storage_days: i64,
    /// Period of the background flush.
    #[serde(rename = "flush_interval_secs", deserialize_with = "structs::seconds")]
    pub flush_interval: Duration,
    /// Console-only logging: no file is ever opened.
    pub file_disabled: bool,
    /// Stops mirroring records to stderr.
    pub console_disabled: bool,
    /// Adds `file:line` of the logging call to every header.
    pub call_site: bool,
    /// Trims call-site paths to their last two segments.
    pub short_path: bool,
    pub mail: MailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            level: Level::Debug,
            max_size: DEFAULT_MAX_SIZE,
            max_storage_days: DEFAULT_MAX_STORAGE_DAYS,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            file_disabled: false,
            console_disabled: false,
            call_site: false,
            short_path: false,
            mail: MailConfig::default(),
        }
    }
}

impl Config {
    /// Parses a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    /// TOML syntax errors, unknown level names, malformed sizes.
    pub fn from_toml_str(content: &str) -> Result<Self, crate::Error> {
        let config: Self = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Loads configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Read failures other than not-found, and everything [`Config::from_toml_str`] rejects.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        internal::debug("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Replaces empty or zero values with the defaults. Negative retention is kept.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.path.is_empty() {
            self.path = DEFAULT_PATH.to_string();
        }
        if self.max_size == 0 {
            self.max_size = DEFAULT_MAX_SIZE;
        }
        if self.max_storage_days == 0 {
            self.max_storage_days = DEFAULT_MAX_STORAGE_DAYS;
        }
        if self.flush_interval.is_zero() {
            self.flush_interval = DEFAULT_FLUSH_INTERVAL;
        }
        self
    }

    /// Mail needs its identity fields whenever it can actually fire, i.e. with file output on.
    ///
    /// # Errors
    /// `IncompleteMail` naming the first missing field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.mail.enabled || self.file_disabled {
            return Ok(());
        }
        self.mail
            .missing_field()
            .map_or(Ok(()), |field| Err(crate::Error::IncompleteMail(field)))
    }
}
