//! Outcome of a retention sweep, kept so tests and callers can see exactly what happened.

use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct SweepResult {
    /// Files removed.
    pub deleted: Vec<PathBuf>,
    /// Bytes reclaimed by the removals.
    pub freed: u64,
    /// Entries that could not be inspected or removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl SweepResult {
    #[must_use]
    pub const fn count(&self) -> usize {
        self.deleted.len()
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
