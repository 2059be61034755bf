//! Stepwise construction on top of [`Config`], plus the pieces that are not
//! configuration: the mail transport and which background tasks to run.

use super::Logger;
use crate::config::{Config, MailConfig};
use crate::daemon::DaemonOptions;
use crate::level::Level;
use crate::mail::MailTransport;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub struct LoggerBuilder {
    config: Config,
    transport: Option<Arc<dyn MailTransport>>,
    daemon: DaemonOptions,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every configuration field at once.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    #[must_use]
    pub const fn max_size(mut self, bytes: u64) -> Self {
        self.config.max_size = bytes;
        self
    }

    #[must_use]
    pub const fn max_storage_days(mut self, days: i64) -> Self {
        self.config.max_storage_days = days;
        self
    }

    #[must_use]
    pub const fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    #[must_use]
    pub const fn file_output(mut self, enabled: bool) -> Self {
        self.config.file_disabled = !enabled;
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console_disabled = !enabled;
        self
    }

    #[must_use]
    pub const fn call_site(mut self, enabled: bool) -> Self {
        self.config.call_site = enabled;
        self
    }

    #[must_use]
    pub const fn short_path(mut self, enabled: bool) -> Self {
        self.config.short_path = enabled;
        self
    }

    #[must_use]
    pub fn mail(mut self, mail: MailConfig) -> Self {
        self.config.mail = mail;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: impl MailTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Periodic flush-to-disk. On by default.
    #[must_use]
    pub const fn flush_daemon(mut self, enabled: bool) -> Self {
        self.daemon.flush = enabled;
        self
    }

    /// SIGTERM/SIGINT/SIGHUP/SIGQUIT flush-and-exit hook. On by default.
    #[must_use]
    pub const fn signal_hook(mut self, enabled: bool) -> Self {
        self.daemon.signals = enabled;
        self
    }

    /// Applies defaults for zero values and validates the mail settings.
    ///
    /// # Errors
    /// `IncompleteMail` when mail is enabled without its identity fields.
    pub fn build(self) -> Result<Logger, crate::Error> {
        let config = self.config.normalized();
        config.validate()?;
        Ok(Logger::from_parts(config, self.transport, self.daemon))
    }
}
