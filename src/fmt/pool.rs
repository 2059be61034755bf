//! Free list of [`RecordBuffer`]s shared by every logging thread.

use super::RecordBuffer;
use std::sync::{Mutex, PoisonError};

/// Idle buffers kept around; extras are dropped on release.
const MAX_IDLE: usize = 64;
/// A buffer that grew past this for one huge record is not worth keeping.
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Recycles buffers by capacity only. A released buffer is always cleared, so
/// no bytes from one record can leak into the next caller's record.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<RecordBuffer>>,
}

impl BufferPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty buffer, recycled when one is idle.
    #[must_use]
    pub fn acquire(&self) -> RecordBuffer {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    /// Clears `buf` and makes it available to the next [`BufferPool::acquire`].
    pub fn release(&self, mut buf: RecordBuffer) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < MAX_IDLE {
            free.push(buf);
        }
    }

    /// Number of buffers waiting for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
