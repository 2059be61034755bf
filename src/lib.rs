#![forbid(unsafe_code)]

//! `daylog` - buffered file logging with day and size rotation.
//!
//! - One lock per logger: concurrent callers never interleave partial lines
//! - Rotation when the calendar day changes or the size limit would be reached
//! - Rotated files named `<base>_<YYYY-MM-DD>[_<n>]<ext>`, swept after a retention window
//! - Periodic flush, and a flush-then-exit on SIGTERM/SIGINT/SIGHUP/SIGQUIT
//! - Optional mail of each rotated file through an application-supplied transport
//!
//! # Example
//!
//! ```no_run
//! use daylog::{Level, Logger};
//!
//! let logger = Logger::builder()
//!     .path("logs/app.log")
//!     .max_size(64 * 1024 * 1024)
//!     .level(Level::Info)
//!     .call_site(true)
//!     .short_path(true)
//!     .build()?;
//!
//! daylog::info!(logger: logger, "listening on {}", 8080);
//! logger.warn_values(&[&"slow request", &412, &"ms"]);
//! logger.flush()?;
//! # Ok::<(), daylog::Error>(())
//! ```
//!
//! The free functions and macros without `logger:` use a process-wide
//! instance, created on first use unless [`init`] installed one.

pub mod cleanup;
pub mod config;
mod daemon;
mod error;
pub mod fmt;
mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod mail;
pub mod output;

pub use cleanup::{RetentionSweep, SweepResult, format_size, parse_size};
pub use config::{Config, MailConfig};
pub use daemon::DaemonOptions;
pub use error::Error;
pub use global::{debug, error, fatal, flush, global, info, init, send_log_mail, warn};
pub use level::Level;
pub use logger::{LogWriter, Logger, LoggerBuilder};
pub use mail::{Mail, MailNotifier, MailTransport};
pub use output::{LogPath, RotatingFile, Rotation};
