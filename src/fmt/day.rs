//! The `YYYY/MM/DD` prefix doubles as the day-boundary key for rotation, so it
//! is compared as raw bytes instead of re-parsing a timestamp per record.

use super::{put2, put4};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Length of the `YYYY/MM/DD` prefix every record starts with.
pub const DATE_LEN: usize = 10;

/// Calendar day of a record or of the open log file, in record-prefix form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayStamp([u8; DATE_LEN]);

impl DayStamp {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let mut raw = [b'/'; DATE_LEN];
        put4(&mut raw, 0, u32::try_from(date.year()).unwrap_or(0));
        put2(&mut raw, 5, date.month());
        put2(&mut raw, 8, date.day());
        Self(raw)
    }

    /// Local calendar day, the same clock the formatter stamps records with.
    #[must_use]
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Reads the stamp off the front of a formatted record.
    ///
    /// Returns `None` unless the first ten bytes have the exact `dddd/dd/dd` shape.
    #[must_use]
    pub fn from_record(record: &[u8]) -> Option<Self> {
        let head: [u8; DATE_LEN] = record.get(..DATE_LEN)?.try_into().ok()?;
        let shaped = head.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'/',
            _ => b.is_ascii_digit(),
        });
        shaped.then_some(Self(head))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DATE_LEN] {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ever built from ASCII digits and slashes.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
