//! Mails the content of a log file when it is rotated away, on fatal exit, or on request.
//!
//! Delivery itself belongs to a [`MailTransport`] supplied by the application
//! (SMTP client, HTTP relay, ...). Failures are reported and swallowed by the
//! logger: mail must never take the logging path down with it.

use crate::config::MailConfig;
use crate::internal;
use std::fs;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Upper bound on mail delivery during a fatal exit, so a hung transport cannot stall it.
pub const FATAL_MAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a transport needs to deliver one log file.
#[derive(Clone, PartialEq, Eq)]
pub struct Mail {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender display name.
    pub nickname: String,
    /// Sender address.
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    /// Base name of the log file. Transports prefix it with the send date.
    pub attachment_name: String,
    /// Raw file content, sent as the HTML body.
    pub body: String,
}

impl std::fmt::Debug for Mail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mail")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .field("subject", &self.subject)
            .field("attachment_name", &self.attachment_name)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

impl Mail {
    /// Reads `file` whole and addresses it according to `config`.
    ///
    /// # Errors
    /// The file cannot be read.
    pub fn compose(config: &MailConfig, file: &Path) -> Result<Self, crate::Error> {
        let content = fs::read(file)?;
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            username: config.user.clone(),
            password: config.password.clone(),
            nickname: config.nickname.clone(),
            from: config.user.clone(),
            recipients: config.recipients.clone(),
            subject: config.subject.clone(),
            attachment_name: file
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned()),
            body: String::from_utf8_lossy(&content).into_owned(),
        })
    }
}

/// Delivery backend. Returns a descriptive error on failure.
pub trait MailTransport: Send + Sync {
    /// # Errors
    /// Any delivery failure, described for the logger's diagnostics.
    fn send(&self, mail: &Mail) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Turns "this file was closed" into a mail, when mail is enabled and a transport is attached.
#[derive(Clone, Default)]
pub struct MailNotifier {
    transport: Option<Arc<dyn MailTransport>>,
}

impl std::fmt::Debug for MailNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailNotifier")
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl MailNotifier {
    #[must_use]
    pub fn new(transport: Option<Arc<dyn MailTransport>>) -> Self {
        Self { transport }
    }

    pub fn set_transport(&mut self, transport: Arc<dyn MailTransport>) {
        self.transport = Some(transport);
    }

    #[must_use]
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Mails `file` synchronously. Disabled mail is a successful no-op.
    ///
    /// # Errors
    /// No transport, unreadable file, or a transport failure.
    pub fn notify(&self, config: &MailConfig, file: &Path) -> Result<(), crate::Error> {
        let Some((transport, mail)) = self.prepare(config, file)? else {
            return Ok(());
        };
        transport
            .send(&mail)
            .map_err(|e| crate::Error::Mail(e.to_string()))
    }

    /// Like [`MailNotifier::notify`], but gives up after `timeout`. The delivery
    /// thread is left behind on timeout.
    ///
    /// # Errors
    /// Everything `notify` reports, plus `MailTimeout`.
    pub fn notify_within(
        &self,
        config: &MailConfig,
        file: &Path,
        timeout: Duration,
    ) -> Result<(), crate::Error> {
        let Some((transport, mail)) = self.prepare(config, file)? else {
            return Ok(());
        };
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("daylog-mail".to_string())
            .spawn(move || {
                let outcome = transport.send(&mail).map_err(|e| e.to_string());
                let _ = tx.send(outcome);
            })?;
        match rx.recv_timeout(timeout) {
            Ok(outcome) => outcome.map_err(crate::Error::Mail),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(crate::Error::MailTimeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(crate::Error::Mail("transport panicked".to_string()))
            }
        }
    }

    /// `notify`, with any failure reported instead of returned.
    pub fn notify_best_effort(&self, config: &MailConfig, file: &Path) {
        if let Err(e) = self.notify(config, file) {
            internal::warn("MAIL", &format!("log sendmail error: {e}"));
        }
    }

    fn prepare(
        &self,
        config: &MailConfig,
        file: &Path,
    ) -> Result<Option<(Arc<dyn MailTransport>, Mail)>, crate::Error> {
        if !config.enabled {
            return Ok(None);
        }
        let transport = self.transport.clone().ok_or(crate::Error::NoTransport)?;
        let mail = Mail::compose(config, file)?;
        internal::debug(
            "MAIL",
            &format!(
                "Sending {} ({} bytes) to {} recipients",
                mail.attachment_name,
                mail.body.len(),
                mail.recipients.len()
            ),
        );
        Ok(Some((transport, mail)))
    }
}
