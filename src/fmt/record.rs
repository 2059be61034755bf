//! Reusable line buffer that renders one record at a time.

use super::{DIGITS, put2, put4, short_path};
use crate::level::Level;
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;
use std::io::Write;
use std::panic::Location;

const SCRATCH_LEN: usize = 64;

/// Source position embedded in the header when call-site capture is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    #[must_use]
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// Call site of a `#[track_caller]` chain.
    #[must_use]
    pub fn from_location(location: &'a Location<'a>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Scratch space for digit writing plus the growable rendered line.
///
/// Contents are meaningless between [`RecordBuffer::clear`] calls; nothing
/// about a previous record survives a clear.
#[derive(Debug, Clone)]
pub struct RecordBuffer {
    scratch: [u8; SCRATCH_LEN],
    line: Vec<u8>,
}

impl Default for RecordBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scratch: [0; SCRATCH_LEN],
            line: Vec::with_capacity(256),
        }
    }

    /// Writes `d` right-aligned at the end of the scratch array, then moves it to `scratch[i..]`.
    /// Returns the number of digits.
    fn put_n(&mut self, i: usize, mut d: u32) -> usize {
        let mut j = SCRATCH_LEN;
        loop {
            j -= 1;
            self.scratch[j] = DIGITS[(d % 10) as usize];
            d /= 10;
            if d == 0 {
                break;
            }
        }
        self.scratch.copy_within(j.., i);
        SCRATCH_LEN - j
    }

    /// Renders `YYYY/MM/DD HH:MM:SS [LEVEL] ` and, when given, `file:line `.
    pub fn header(
        &mut self,
        now: &NaiveDateTime,
        level: Level,
        call_site: Option<CallSite<'_>>,
        short: bool,
    ) {
        let t = &mut self.scratch;
        put4(t, 0, u32::try_from(now.year()).unwrap_or(0));
        t[4] = b'/';
        put2(t, 5, now.month());
        t[7] = b'/';
        put2(t, 8, now.day());
        t[10] = b' ';
        put2(t, 11, now.hour());
        t[13] = b':';
        put2(t, 14, now.minute());
        t[16] = b':';
        put2(t, 17, now.second());
        t[19] = b' ';
        let tag = level.tag().as_bytes();
        let end = 20 + tag.len();
        t[20..end].copy_from_slice(tag);
        t[end] = b' ';
        self.line.extend_from_slice(&t[..=end]);

        if let Some(site) = call_site {
            let file = if short {
                short_path(site.file)
            } else {
                site.file
            };
            self.line.extend_from_slice(file.as_bytes());
            self.scratch[0] = b':';
            let n = self.put_n(1, site.line);
            self.scratch[n + 1] = b' ';
            self.line.extend_from_slice(&self.scratch[..n + 2]);
        }
    }

    /// Format-string payload.
    pub fn message(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a Vec only fails if a Display impl reports an error.
        let _ = self.line.write_fmt(args);
    }

    /// Positional payload: every value rendered, separated by single spaces.
    pub fn message_values(&mut self, values: &[&dyn fmt::Display]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.line.push(b' ');
            }
            let _ = write!(self.line, "{value}");
        }
    }

    /// Pre-rendered payload from a raw writer.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.line.extend_from_slice(bytes);
    }

    /// Leaves exactly one trailing `\n`, whatever the payload ended with.
    pub fn finish_line(&mut self) {
        while self.line.last() == Some(&b'\n') {
            self.line.pop();
        }
        self.line.push(b'\n');
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.line
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.line.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    pub fn clear(&mut self) {
        self.line.clear();
    }
}
