//! Process-wide logger behind a `OnceLock`, for code that does not want to
//! pass a [`Logger`] around.
//!
//! The slot is filled either explicitly with [`init`] or lazily with the
//! default configuration on first use. Independent instances built with
//! [`Logger::builder`] never touch it.

use crate::config::Config;
use crate::internal;
use crate::logger::Logger;
use std::fmt;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Installs the process-wide logger.
///
/// Only the first call (or first use, whichever comes first) takes effect;
/// later configurations are reported and dropped, and the installed logger is returned.
pub fn init(config: Config) -> &'static Logger {
    let mut installed = false;
    let logger = GLOBAL.get_or_init(|| {
        installed = true;
        Logger::new(config)
    });
    if !installed {
        internal::warn("GLOBAL", "Global logger already initialized, ignoring new config");
    }
    logger
}

/// The process-wide logger, created with default settings if nothing was installed.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| Logger::new(Config::default()))
}

#[track_caller]
pub fn debug(args: fmt::Arguments<'_>) {
    global().debug(args);
}

#[track_caller]
pub fn info(args: fmt::Arguments<'_>) {
    global().info(args);
}

#[track_caller]
pub fn warn(args: fmt::Arguments<'_>) {
    global().warn(args);
}

#[track_caller]
pub fn error(args: fmt::Arguments<'_>) {
    global().error(args);
}

#[track_caller]
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    global().fatal(args)
}

/// Flushes the process-wide logger.
///
/// # Errors
/// Flush or sync failures.
pub fn flush() -> Result<(), crate::Error> {
    global().flush()
}

/// Mails the process-wide logger's current file.
///
/// # Errors
/// See [`Logger::send_log_mail`].
pub fn send_log_mail() -> Result<(), crate::Error> {
    global().send_log_mail()
}

/// Logs through the process-wide logger, or through `logger: expr` when given.
///
/// ```no_run
/// daylog::log!(daylog::Level::Info, "{} jobs queued", 3);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::global().log($level, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}

/// Logs at FATAL, flushes, and exits the process.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::global().fatal(::std::format_args!($($arg)+))
    };
}
