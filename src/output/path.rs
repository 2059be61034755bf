//! Active-file path decomposition and backup naming.
//!
//! `logs/app.log` rotates to `logs/app_2026-10-16.log`, then
//! `logs/app_2026-10-16_0.log`, `logs/app_2026-10-16_1.log`, ... when a name is taken.

use chrono::NaiveDate;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix used for backups and the sweep when the configured path has no extension.
pub const DEFAULT_SUFFIX: &str = ".log";
/// Numbered candidates tried before a rotation gives up.
pub const MAX_BACKUP_ATTEMPTS: usize = 1000;

/// The configured log path split into the pieces rotation and sweeping need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPath {
    path: PathBuf,
    /// Path without the extension, e.g. `logs/app`.
    stem: OsString,
    /// Extension with its dot, e.g. `.log`.
    suffix: String,
}

impl LogPath {
    /// Expands a leading `~` and splits off the extension.
    #[must_use]
    pub fn new(path: &str) -> Self {
        let path = PathBuf::from(shellexpand::tilde(path).as_ref());
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()));
        let stem = if suffix.is_some() {
            path.with_extension("").into_os_string()
        } else {
            path.clone().into_os_string()
        };

        Self {
            path,
            stem,
            suffix: suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Directory holding the active file and its backups; `.` for bare file names.
    #[must_use]
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `<stem>_<date><suffix>` for `attempt == None`, `<stem>_<date>_<n><suffix>` otherwise.
    #[must_use]
    pub fn backup_candidate(&self, date: NaiveDate, attempt: Option<usize>) -> PathBuf {
        let mut name = self.stem.clone();
        name.push(date.format("_%Y-%m-%d").to_string());
        if let Some(n) = attempt {
            name.push(format!("_{n}"));
        }
        name.push(&self.suffix);
        PathBuf::from(name)
    }

    /// First backup name for `date` that does not exist yet.
    ///
    /// # Errors
    /// `AlreadyExists` once [`MAX_BACKUP_ATTEMPTS`] numbered names are all taken.
    pub fn next_backup(&self, date: NaiveDate) -> io::Result<PathBuf> {
        std::iter::once(None)
            .chain((0..MAX_BACKUP_ATTEMPTS).map(Some))
            .map(|attempt| self.backup_candidate(date, attempt))
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!(
                        "no free backup name for {} on {date}",
                        self.path.display()
                    ),
                )
            })
    }
}
