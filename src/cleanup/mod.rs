//! Retention sweep: deletes rotated log files older than the retention window.
//!
//! Runs off the write path. It only needs the directory, suffix and window,
//! which the logger copies out under its lock before spawning the sweep.

mod result;
mod size;

pub use result::SweepResult;
pub use size::{format_size, parse_size};

use crate::internal;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 86_400;

/// One sweep over a log directory.
#[derive(Debug, Clone)]
pub struct RetentionSweep {
    dir: PathBuf,
    suffix: String,
    max_age_days: i64,
    keep: Option<OsString>,
}

impl RetentionSweep {
    /// `max_age_days < 0` disables deletion entirely.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>, max_age_days: i64) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
            max_age_days,
            keep: None,
        }
    }

    /// Never deletes the file named like `path`, whatever its age. Used for the active file.
    #[must_use]
    pub fn keep(mut self, path: &Path) -> Self {
        self.keep = path.file_name().map(ToOwned::to_owned);
        self
    }

    /// Oldest modification time that survives a sweep at `now`, `None` when disabled.
    #[must_use]
    pub fn cutoff(&self, now: SystemTime) -> Option<SystemTime> {
        let days = u64::try_from(self.max_age_days).ok()?;
        let window = Duration::from_secs(days.saturating_mul(SECS_PER_DAY));
        Some(now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH))
    }

    /// Sweeps relative to the current time.
    #[must_use]
    pub fn run(&self) -> SweepResult {
        self.run_at(SystemTime::now())
    }

    /// Deletes every regular file in the directory whose name ends with the
    /// suffix and whose mtime is strictly before the cutoff.
    ///
    /// Subdirectories are neither deleted nor descended into. Per-file failures
    /// are reported and recorded; the sweep carries on with the next entry.
    #[must_use]
    pub fn run_at(&self, now: SystemTime) -> SweepResult {
        let mut result = SweepResult::default();
        let Some(cutoff) = self.cutoff(now) else {
            internal::debug("CLEANUP", "Retention disabled, skipping sweep");
            return result;
        };

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                internal::warn(
                    "CLEANUP",
                    &format!("Unable to read {}: {e}", self.dir.display()),
                );
                result.failed.push((self.dir.clone(), e.to_string()));
                return result;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    internal::warn("CLEANUP", &format!("Unable to read entry: {e}"));
                    result.failed.push((self.dir.clone(), e.to_string()));
                    continue;
                }
            };
            let path = entry.path();
            match self.expired(&entry, cutoff) {
                Ok(Some(size)) => match fs::remove_file(&path) {
                    Ok(()) => {
                        internal::debug("CLEANUP", &format!("Deleted: {}", path.display()));
                        result.deleted.push(path);
                        result.freed += size;
                    }
                    Err(e) => {
                        internal::warn(
                            "CLEANUP",
                            &format!("Unable to delete old file '{}': {e}", path.display()),
                        );
                        result.failed.push((path, e.to_string()));
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    internal::warn(
                        "CLEANUP",
                        &format!("Unable to inspect '{}': {e}", path.display()),
                    );
                    result.failed.push((path, e.to_string()));
                }
            }
        }

        internal::debug(
            "CLEANUP",
            &format!(
                "Sweep of {} complete: {} files, {} freed",
                self.dir.display(),
                result.count(),
                format_size(result.freed)
            ),
        );
        result
    }

    /// Size of the file when it is a deletion candidate.
    fn expired(&self, entry: &fs::DirEntry, cutoff: SystemTime) -> io::Result<Option<u64>> {
        let name = entry.file_name();
        if self.keep.as_ref() == Some(&name) || !name.to_string_lossy().ends_with(&self.suffix) {
            return Ok(None);
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            return Ok(None);
        }
        Ok((meta.modified()? < cutoff).then_some(meta.len()))
    }

    /// Runs the sweep on a detached background thread.
    ///
    /// Returns `None` (after reporting) when the thread cannot be spawned.
    pub fn spawn(self) -> Option<JoinHandle<SweepResult>> {
        thread::Builder::new()
            .name("daylog-sweep".to_string())
            .spawn(move || self.run())
            .map_err(|e| internal::warn("CLEANUP", &format!("Unable to start sweep: {e}")))
            .ok()
    }
}
