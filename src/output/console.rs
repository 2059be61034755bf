//! Console echo. Goes to stderr so it never mixes with a program's stdout data.

use std::io::{self, Write};

/// Mirrors one record to stderr in a single locked write.
pub fn echo(record: &[u8]) {
    // Last-resort visibility only; a broken stderr must not stop file logging.
    let _ = io::stderr().lock().write_all(record);
}
