//! The logger instance: level gate, formatter, and the locked dispatcher that
//! feeds the rotation engine.
//!
//! Locking: `Inner::state` is the one lock per instance. It guards the
//! configuration, the rotation engine (file handle, writer, size, day stamp)
//! and the mail notifier. The threshold and the two call-site flags are also
//! mirrored into atomics so formatting can read them without the lock; they
//! are only ever written while `state` is held.

mod builder;
mod writer;

pub use builder::LoggerBuilder;
pub use writer::LogWriter;

use crate::cleanup::RetentionSweep;
use crate::config::{Config, MailConfig};
use crate::daemon::{Daemon, DaemonOptions};
use crate::fmt::{BufferPool, CallSite, DayStamp};
use crate::internal;
use crate::level::Level;
use crate::mail::{FATAL_MAIL_TIMEOUT, MailNotifier, MailTransport};
use crate::output::{self, LogPath, RotatingFile, Rotation};
use chrono::Local;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Exit status used when a FATAL record, a write or rotation failure, or a
/// configuration failure ends the process. A signal shutdown exits with 0.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// What the caller handed over: a format string or a list of values to join.
#[derive(Clone, Copy)]
pub(crate) enum Payload<'a> {
    Format(fmt::Arguments<'a>),
    Values(&'a [&'a dyn fmt::Display]),
}

/// Everything the instance lock guards.
struct State {
    config: Config,
    file: RotatingFile,
    notifier: MailNotifier,
}

impl State {
    /// Opens or rotates as needed, then appends. Caller holds the lock.
    fn persist(&mut self, record: &[u8]) -> io::Result<()> {
        let day = DayStamp::from_record(record).unwrap_or_else(DayStamp::today);
        let Self {
            config,
            file,
            notifier,
        } = self;

        if !file.is_open() {
            file.open(day)?;
        }

        if let Some(reason) = file.rotation_for(day, record.len(), config.max_size) {
            if reason == Rotation::Day {
                let target = file.target();
                let _ = RetentionSweep::new(target.dir(), target.suffix(), config.max_storage_days)
                    .keep(target.path())
                    .spawn();
            }
            internal::debug("FILE", &format!("Rotating ({reason:?})"));
            file.rotate(day, Local::now().date_naive(), |closed| {
                notifier.notify_best_effort(&config.mail, closed);
            })?;
        }

        file.append(record)
    }

    /// Last stop for an I/O failure: report, flush what is buffered, try to
    /// mail the file, terminate.
    fn fatal_exit(&mut self, err: &io::Error) -> ! {
        internal::error("WRITE", &format!("exiting because of error: {err}"));
        if let Err(e) = self.file.flush_sync() {
            internal::error("WRITE", &format!("final flush failed: {e}"));
        }
        let path = self.file.target().path();
        if path.exists()
            && let Err(e) = self
                .notifier
                .notify_within(&self.config.mail, path, FATAL_MAIL_TIMEOUT)
        {
            internal::warn("MAIL", &format!("log sendmail error: {e}"));
        }
        terminate(FAILURE_EXIT_CODE)
    }
}

/// Shared between the [`Logger`] handle, its [`LogWriter`]s and the daemon threads.
pub(crate) struct Inner {
    state: Mutex<State>,
    pool: BufferPool,
    level: AtomicU8,
    call_site: AtomicBool,
    short_path: AtomicBool,
}

impl Inner {
    fn new(config: Config, notifier: MailNotifier) -> Self {
        Self {
            level: AtomicU8::new(config.level as u8),
            call_site: AtomicBool::new(config.call_site),
            short_path: AtomicBool::new(config.short_path),
            pool: BufferPool::new(),
            state: Mutex::new(State {
                file: RotatingFile::new(LogPath::new(&config.path)),
                config,
                notifier,
            }),
        }
    }

    /// A panic while holding the lock leaves the state structurally valid, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn threshold(&self) -> Level {
        Level::try_from(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Formats outside the lock, then dispatches the finished line.
    pub(crate) fn emit(&self, level: Level, caller: &'static Location<'static>, payload: Payload<'_>) {
        if level < self.threshold() {
            return;
        }

        let mut buf = self.pool.acquire();
        let site = self
            .call_site
            .load(Ordering::Relaxed)
            .then(|| CallSite::from_location(caller));
        buf.header(
            &Local::now().naive_local(),
            level,
            site,
            self.short_path.load(Ordering::Relaxed),
        );
        match payload {
            Payload::Format(args) => buf.message(args),
            Payload::Values(values) => buf.message_values(values),
        }
        buf.finish_line();
        self.write_record(buf.as_bytes());
        self.pool.release(buf);
    }

    /// Dispatches text that did not come through the formatter, adding an
    /// INFO header when it lacks a date prefix.
    pub(crate) fn write_raw(&self, bytes: &[u8]) {
        let mut buf = self.pool.acquire();
        if DayStamp::from_record(bytes).is_none() {
            buf.header(&Local::now().naive_local(), Level::Info, None, false);
        }
        buf.push_bytes(bytes);
        buf.finish_line();
        self.write_record(buf.as_bytes());
        self.pool.release(buf);
    }

    /// The dispatcher. `record` is newline-terminated and starts with `YYYY/MM/DD`.
    pub(crate) fn write_record(&self, record: &[u8]) {
        let mut state = self.lock();
        if !state.config.console_disabled {
            output::echo(record);
        }
        if state.config.file_disabled {
            return;
        }
        if let Err(e) = state.persist(record) {
            state.fatal_exit(&e);
        }
    }

    pub(crate) fn flush(&self) -> Result<(), crate::Error> {
        let mut state = self.lock();
        if state.config.file_disabled {
            return Ok(());
        }
        state.file.flush_sync().map_err(crate::Error::from)
    }

    pub(crate) fn flush_interval(&self) -> Duration {
        self.lock().config.flush_interval
    }

    /// Graceful shutdown on a termination signal.
    pub(crate) fn shutdown(&self, signal: &str) -> ! {
        self.emit(
            Level::Warn,
            Location::caller(),
            Payload::Format(format_args!("exit by signal {signal}")),
        );
        if let Err(e) = self.flush() {
            internal::error("DAEMON", &format!("shutdown flush failed: {e}"));
        }
        terminate(0)
    }
}

pub(crate) fn terminate(code: i32) -> ! {
    std::process::exit(code)
}

/// A startup-time contract violation: report and stop before anything is logged.
pub(crate) fn contract_violation(err: &crate::Error) -> ! {
    internal::error("CONFIG", &format!("exiting because of error: {err}"));
    terminate(FAILURE_EXIT_CODE)
}

/// A buffered, rotating file logger.
///
/// Cheap to share by reference across threads; every public method takes `&self`.
/// Dropping it stops the background flush and signal watch and flushes the file.
pub struct Logger {
    inner: Arc<Inner>,
    daemon: Mutex<Option<Daemon>>,
    daemon_options: DaemonOptions,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("daemon_options", &self.daemon_options)
            .finish_non_exhaustive()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Builds a logger with background flush and signal handling.
    ///
    /// Incomplete mail settings are a startup contract violation: they are
    /// reported on stderr and the process exits.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::try_new(config).unwrap_or_else(|e| contract_violation(&e))
    }

    /// [`Logger::new`] that returns the configuration error instead of exiting.
    ///
    /// # Errors
    /// `IncompleteMail` when mail is enabled without its identity fields.
    pub fn try_new(config: Config) -> Result<Self, crate::Error> {
        Self::builder().config(config).build()
    }

    fn from_parts(
        config: Config,
        transport: Option<Arc<dyn MailTransport>>,
        daemon_options: DaemonOptions,
    ) -> Self {
        let file_enabled = !config.file_disabled;
        let logger = Self {
            inner: Arc::new(Inner::new(config, MailNotifier::new(transport))),
            daemon: Mutex::new(None),
            daemon_options,
        };
        if file_enabled {
            logger.ensure_daemon();
        }
        logger
    }

    fn ensure_daemon(&self) {
        let mut slot = self.daemon.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(Daemon::start(&self.inner, self.daemon_options));
        }
    }

    /// Logs a format-string record: `logger.log(Level::Info, format_args!("{n} items"))`.
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.inner
            .emit(level, Location::caller(), Payload::Format(args));
    }

    /// Logs the values joined by single spaces.
    #[track_caller]
    pub fn log_values(&self, level: Level, values: &[&dyn fmt::Display]) {
        self.inner
            .emit(level, Location::caller(), Payload::Values(values));
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    /// Logs at FATAL, flushes, and terminates the process.
    ///
    /// The exit status is [`FAILURE_EXIT_CODE`] (1), not 0, so a supervisor
    /// can tell a fatal stop from a clean one. The same status ends the
    /// process on write failures and on incomplete mail settings.
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        self.log(Level::Fatal, args);
        self.exit_after_fatal()
    }

    #[track_caller]
    pub fn debug_values(&self, values: &[&dyn fmt::Display]) {
        self.log_values(Level::Debug, values);
    }

    #[track_caller]
    pub fn info_values(&self, values: &[&dyn fmt::Display]) {
        self.log_values(Level::Info, values);
    }

    #[track_caller]
    pub fn warn_values(&self, values: &[&dyn fmt::Display]) {
        self.log_values(Level::Warn, values);
    }

    #[track_caller]
    pub fn error_values(&self, values: &[&dyn fmt::Display]) {
        self.log_values(Level::Error, values);
    }

    /// [`Logger::fatal`] for joined values.
    #[track_caller]
    pub fn fatal_values(&self, values: &[&dyn fmt::Display]) -> ! {
        self.log_values(Level::Fatal, values);
        self.exit_after_fatal()
    }

    fn exit_after_fatal(&self) -> ! {
        if let Err(e) = self.inner.flush() {
            internal::error("WRITE", &format!("flush before fatal exit failed: {e}"));
        }
        terminate(FAILURE_EXIT_CODE)
    }

    /// Dispatches an already formatted record.
    ///
    /// `record` must end with `\n` and start with a `YYYY/MM/DD` stamp; the stamp
    /// drives day rotation. Use [`Logger::writer`] for arbitrary text.
    /// An I/O failure here ends the process.
    pub fn write_record(&self, record: &[u8]) {
        self.inner.write_record(record);
    }

    /// `io::Write` handle for components that produce their own text.
    #[must_use]
    pub fn writer(&self) -> LogWriter {
        LogWriter::new(Arc::clone(&self.inner))
    }

    /// Pushes buffered records to disk and syncs the file.
    ///
    /// # Errors
    /// Flush or sync failures.
    pub fn flush(&self) -> Result<(), crate::Error> {
        self.inner.flush()
    }

    /// Flushes and mails the current file now.
    ///
    /// # Errors
    /// Flush failures, a missing transport, or a failed delivery.
    pub fn send_log_mail(&self) -> Result<(), crate::Error> {
        let mut state = self.inner.lock();
        if !state.config.mail.enabled || state.config.file_disabled {
            return Ok(());
        }
        state.file.flush_sync()?;
        let State {
            config,
            file,
            notifier,
        } = &mut *state;
        file.open_path()
            .map_or(Ok(()), |path| notifier.notify(&config.mail, path))
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.lock().config.clone()
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.inner.threshold()
    }

    /// Records below `level` are dropped before formatting.
    pub fn set_level(&self, level: Level) {
        let mut state = self.inner.lock();
        state.config.level = level;
        self.inner.level.store(level as u8, Ordering::Relaxed);
    }

    /// Zero restores the default limit.
    pub fn set_max_size(&self, bytes: u64) {
        self.inner.lock().config.max_size = if bytes == 0 {
            crate::config::DEFAULT_MAX_SIZE
        } else {
            bytes
        };
    }

    /// Negative disables the retention sweep.
    pub fn set_max_storage_days(&self, days: i64) {
        self.inner.lock().config.max_storage_days = days;
    }

    /// Takes effect at the next tick of the flush loop. Zero restores the default.
    pub fn set_flush_interval(&self, interval: Duration) {
        self.inner.lock().config.flush_interval = if interval.is_zero() {
            crate::config::DEFAULT_FLUSH_INTERVAL
        } else {
            interval
        };
    }

    /// Disabling flushes and closes the open file; enabling starts the background flush.
    pub fn set_file_disabled(&self, disabled: bool) {
        {
            let mut state = self.inner.lock();
            state.config.file_disabled = disabled;
            if disabled && let Err(e) = state.file.close() {
                internal::warn("FILE", &format!("closing log file failed: {e}"));
            }
        }
        if !disabled {
            self.ensure_daemon();
        }
    }

    pub fn set_console_disabled(&self, disabled: bool) {
        self.inner.lock().config.console_disabled = disabled;
    }

    pub fn set_call_site(&self, enabled: bool) {
        let mut state = self.inner.lock();
        state.config.call_site = enabled;
        self.inner.call_site.store(enabled, Ordering::Relaxed);
    }

    pub fn set_short_path(&self, enabled: bool) {
        let mut state = self.inner.lock();
        state.config.short_path = enabled;
        self.inner.short_path.store(enabled, Ordering::Relaxed);
    }

    /// Closes the current file; the next record opens `path`.
    pub fn set_path(&self, path: &str) {
        let mut state = self.inner.lock();
        if let Err(e) = state.file.close() {
            internal::warn("FILE", &format!("closing log file failed: {e}"));
        }
        state.config.path = if path.is_empty() {
            crate::config::DEFAULT_PATH.to_string()
        } else {
            path.to_string()
        };
        state.file = RotatingFile::new(LogPath::new(&state.config.path));
    }

    /// Replaces the mail settings. An enabled but incomplete config ends the process.
    pub fn set_mail_config(&self, mail: MailConfig) {
        let mut state = self.inner.lock();
        let mut candidate = state.config.clone();
        candidate.mail = mail;
        if let Err(e) = candidate.validate() {
            contract_violation(&e);
        }
        state.config.mail = candidate.mail;
    }

    /// With mail enabled, an empty list is a contract violation that ends the process.
    pub fn set_mail_recipients(&self, recipients: Vec<String>) {
        let mut state = self.inner.lock();
        let mut candidate = state.config.clone();
        candidate.mail.recipients = recipients;
        if let Err(e) = candidate.validate() {
            contract_violation(&e);
        }
        state.config.mail.recipients = candidate.mail.recipients;
    }

    /// Turning mail on re-validates the mail settings; incomplete ones end the process.
    pub fn set_mail_enabled(&self, enabled: bool) {
        let mut state = self.inner.lock();
        if enabled {
            let mut candidate = state.config.clone();
            candidate.mail.enabled = true;
            if let Err(e) = candidate.validate() {
                contract_violation(&e);
            }
        }
        state.config.mail.enabled = enabled;
    }

    pub fn set_mail_transport(&self, transport: Arc<dyn MailTransport>) {
        self.inner.lock().notifier.set_transport(transport);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let daemon = self
            .daemon
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(daemon) = daemon {
            daemon.stop();
        }
        if let Err(e) = self.inner.flush() {
            internal::warn("FILE", &format!("flush on drop failed: {e}"));
        }
    }
}
