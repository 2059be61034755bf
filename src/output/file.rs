//! The rotation engine: owns the active file, its accumulated size and its day stamp.
//!
//! Two states, `active == None` (no file open) and `active == Some(_)`. The first
//! append opens the file; day or size boundaries close, rename and reopen it.

use super::LogPath;
use crate::fmt::DayStamp;
use crate::internal;
use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write buffer in front of the active file.
pub const BUFFER_SIZE: usize = 256 * 1024;

/// Why a rotation is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The record's calendar day differs from the open file's day stamp.
    Day,
    /// Appending the record would meet or exceed the size limit.
    Size,
}

#[derive(Debug)]
struct ActiveFile {
    writer: BufWriter<File>,
    /// Bytes in the file: pre-existing length plus everything appended since open.
    size: u64,
    day: DayStamp,
}

/// Active log file plus the rules for replacing it.
#[derive(Debug)]
pub struct RotatingFile {
    target: LogPath,
    active: Option<ActiveFile>,
}

impl RotatingFile {
    /// Nothing is touched on disk until the first [`RotatingFile::open`].
    #[must_use]
    pub const fn new(target: LogPath) -> Self {
        Self {
            target,
            active: None,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &LogPath {
        &self.target
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Size of the open file, `None` while closed.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.size)
    }

    /// Day stamp of the open file, `None` while closed.
    #[must_use]
    pub fn day(&self) -> Option<DayStamp> {
        self.active.as_ref().map(|a| a.day)
    }

    /// Path of the open file, for readers such as the mail notifier.
    #[must_use]
    pub fn open_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|_| self.target.path())
    }

    /// Opens the target in append mode, creating parent directories.
    ///
    /// An existing file keeps its size and its last-modified day; a new file
    /// starts empty and stamped with `day`.
    ///
    /// # Errors
    /// Directory creation or open failures.
    pub fn open(&mut self, day: DayStamp) -> io::Result<()> {
        let path = self.target.path();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let (size, day) = match fs::metadata(path) {
            Ok(meta) => {
                let modified = meta
                    .modified()
                    .map(|m| DayStamp::from_date(DateTime::<Local>::from(m).date_naive()))
                    .unwrap_or(day);
                (meta.len(), modified)
            }
            Err(_) => (0, day),
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        internal::debug(
            "FILE",
            &format!("Opened {} (size {size}, day {day})", path.display()),
        );
        self.active = Some(ActiveFile {
            writer: BufWriter::with_capacity(BUFFER_SIZE, file),
            size,
            day,
        });
        Ok(())
    }

    /// Decides whether a `pending`-byte record stamped `day` must go to a fresh file.
    ///
    /// An empty file is never rotated for size: the oversized record becomes its first line.
    #[must_use]
    pub fn rotation_for(&self, day: DayStamp, pending: usize, max_size: u64) -> Option<Rotation> {
        let active = self.active.as_ref()?;
        if active.day != day {
            return Some(Rotation::Day);
        }
        let pending = u64::try_from(pending).unwrap_or(u64::MAX);
        (active.size > 0 && active.size.saturating_add(pending) >= max_size)
            .then_some(Rotation::Size)
    }

    /// Flushes, syncs and hands the closing file to `before_close`, then renames it
    /// to the first free backup name for `backup_date` and opens a fresh file stamped `day`.
    ///
    /// An empty file is restamped in place instead of producing an empty backup.
    /// Returns the backup path when a rename happened.
    ///
    /// # Errors
    /// Flush, sync, rename or reopen failures. The engine is left closed on error.
    pub fn rotate(
        &mut self,
        day: DayStamp,
        backup_date: NaiveDate,
        before_close: impl FnOnce(&Path),
    ) -> io::Result<Option<PathBuf>> {
        let Some(mut active) = self.active.take() else {
            self.open(day)?;
            return Ok(None);
        };

        if active.size == 0 {
            active.day = day;
            self.active = Some(active);
            return Ok(None);
        }

        active.writer.flush()?;
        active.writer.get_ref().sync_all()?;
        before_close(self.target.path());
        drop(active);

        let backup = self.target.next_backup(backup_date)?;
        fs::rename(self.target.path(), &backup)?;
        internal::debug(
            "FILE",
            &format!(
                "Rotated {} -> {}",
                self.target.path().display(),
                backup.display()
            ),
        );

        self.open(day)?;
        Ok(Some(backup))
    }

    /// Appends one record to the buffered writer.
    ///
    /// # Errors
    /// Write failures; the size counter only grows by what was accepted.
    pub fn append(&mut self, record: &[u8]) -> io::Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "append without an open log file",
            ));
        };
        active.writer.write_all(record)?;
        active.size += u64::try_from(record.len()).unwrap_or(u64::MAX);
        Ok(())
    }

    /// Pushes buffered bytes to the file and syncs it. No-op while closed.
    ///
    /// # Errors
    /// Flush or sync failures.
    pub fn flush_sync(&mut self) -> io::Result<()> {
        if let Some(active) = self.active.as_mut() {
            active.writer.flush()?;
            active.writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    /// Flushes and closes the active file; the next write reopens it.
    ///
    /// # Errors
    /// Flush or sync failures. The file is closed either way.
    pub fn close(&mut self) -> io::Result<()> {
        let result = self.flush_sync();
        self.active = None;
        result
    }
}
