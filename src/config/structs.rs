//! Configuration sub-sections and the serde helpers for human-friendly values.

use crate::cleanup::parse_size;
use crate::level::Level;
use serde::{Deserialize, Deserializer, de};
use std::time::Duration;

/// Mail-on-rotate settings. Everything except `enabled` is handed to the transport untouched.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Off by default; turning it on requires the identity fields below.
    pub enabled: bool,
    /// SMTP-like endpoint host.
    pub host: String,
    /// Endpoint port, 0 lets the transport pick.
    pub port: u16,
    /// Account name, also used as the sender address.
    pub user: String,
    pub password: String,
    /// Sender display name.
    pub nickname: String,
    pub subject: String,
    pub recipients: Vec<String>,
}

impl MailConfig {
    /// Name of the first required field that is empty.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("user", self.user.is_empty()),
            ("password", self.password.is_empty()),
            ("nickname", self.nickname.is_empty()),
            ("subject", self.subject.is_empty()),
            ("recipients", self.recipients.is_empty()),
        ]
        .into_iter()
        .find_map(|(field, missing)| missing.then_some(field))
    }
}

// Keeps the password out of debug output.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("nickname", &self.nickname)
            .field("subject", &self.subject)
            .field("recipients", &self.recipients)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

/// `max_size = 1048576` and `max_size = "1M"` are both accepted.
pub(super) fn size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(n) => Ok(n),
        SizeValue::Text(s) => parse_size(&s).map_err(de::Error::custom),
    }
}

pub(super) fn level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
    String::deserialize(deserializer)?
        .parse()
        .map_err(de::Error::custom)
}

pub(super) fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
