//! Record rendering for the hot path.
//!
//! Every record has the layout
//!
//! ```text
//! YYYY/MM/DD HH:MM:SS [LEVEL] [file:line ]message\n
//! ```
//!
//! Numeric fields are written digit by digit into a fixed scratch array inside
//! the [`RecordBuffer`], and buffers are recycled through a [`BufferPool`], so a
//! steady-state record costs no heap allocation beyond what the caller's
//! `Display` impls do.

mod day;
mod pool;
mod record;

pub use day::{DATE_LEN, DayStamp};
pub use pool::BufferPool;
pub use record::{CallSite, RecordBuffer};

const DIGITS: &[u8; 10] = b"0123456789";

/// Writes the last two decimal digits of `d` at `buf[i..i + 2]`.
#[inline]
pub(crate) fn put2(buf: &mut [u8], i: usize, d: u32) {
    buf[i + 1] = DIGITS[(d % 10) as usize];
    buf[i] = DIGITS[(d / 10 % 10) as usize];
}

/// Writes the last four decimal digits of `d` at `buf[i..i + 4]`.
#[inline]
pub(crate) fn put4(buf: &mut [u8], i: usize, d: u32) {
    put2(buf, i + 2, d % 100);
    put2(buf, i, d / 100 % 100);
}

/// Truncates a `/`-separated path to at most its last two segments.
///
/// `/a/b/c/d.rs` becomes `c/d.rs`; paths with fewer segments are returned unchanged.
#[must_use]
pub fn short_path(path: &str) -> &str {
    let mut slashes = path
        .bytes()
        .enumerate()
        .rev()
        .filter(|&(i, b)| b == b'/' && i > 0);
    slashes.next();
    slashes.next().map_or(path, |(i, _)| &path[i + 1..])
}
