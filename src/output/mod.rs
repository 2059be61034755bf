//! Where formatted records end up: the rotating log file, and stderr as the
//! console echo.

mod console;
mod file;
mod path;

pub use console::echo;
pub use file::{BUFFER_SIZE, RotatingFile, Rotation};
pub use path::{DEFAULT_SUFFIX, LogPath, MAX_BACKUP_ATTEMPTS};
