//! `io::Write` adapter so other text producers can log through the same file.

use super::Inner;
use crate::fmt::DayStamp;
use std::io;
use std::sync::Arc;

/// Line-buffered: every complete line becomes one record, so a `writeln!`
/// that reaches `write` in several pieces still lands as a single line.
///
/// Lines that already start with a `YYYY/MM/DD` stamp are passed through
/// untouched; anything else gets an INFO header. A trailing partial line is
/// dispatched on `flush` or drop.
pub struct LogWriter {
    inner: Arc<Inner>,
    pending: Vec<u8>,
}

impl LogWriter {
    pub(super) const fn new(inner: Arc<Inner>) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    fn dispatch(&self, line: &[u8]) {
        if DayStamp::from_record(line).is_some() && line.ends_with(b"\n") {
            self.inner.write_record(line);
        } else {
            self.inner.write_raw(line);
        }
    }

    fn dispatch_pending(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.dispatch(&line);
        }
    }
}

impl Clone for LogWriter {
    /// The clone starts with no pending partial line.
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.inner))
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.dispatch(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dispatch_pending();
        self.inner.flush().map_err(io::Error::other)
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.dispatch_pending();
    }
}
