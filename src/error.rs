//! Unified error type for all daylog operations.

/// Error type for daylog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error while opening, rotating, writing or syncing a log file.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Mail is enabled but a required mail field is empty.
    IncompleteMail(&'static str),
    /// Level name or number outside DEBUG..=FATAL.
    InvalidLevel(String),
    /// Size string that is not a byte count or `<n>[K|M|G][B]`.
    InvalidSize(String),
    /// Mail is enabled but no transport was attached.
    NoTransport,
    /// The mail transport reported a failure.
    Mail(String),
    /// The mail transport did not answer in time.
    MailTimeout,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::IncompleteMail(field) => write!(
                f,
                "mail is enabled but the configuration is incomplete: missing {field}"
            ),
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::InvalidSize(size) => write!(f, "invalid size: {size}"),
            Self::NoTransport => write!(f, "mail is enabled but no transport is attached"),
            Self::Mail(reason) => write!(f, "mail delivery failed: {reason}"),
            Self::MailTimeout => write!(f, "mail delivery timed out"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
