//! Outgoing mail for the YaMDb API.
//!
//! The API talks to a [`Mailer`] trait object. Three implementations exist:
//!
//! - [`SmtpMailer`] -- real delivery through `lettre`'s async SMTP transport.
//! - [`ConsoleMailer`] -- logs messages instead of sending them; used when
//!   `SMTP_HOST` is not configured.
//! - [`MemoryMailer`] -- records messages in memory for tests.

use std::sync::Arc;

use async_trait::async_trait;

mod config;
mod console;
mod error;
mod memory;
mod smtp;

pub use config::EmailConfig;
pub use console::ConsoleMailer;
pub use error::MailError;
pub use memory::{MemoryMailer, SentMail};
pub use smtp::SmtpMailer;

/// Sends a plain-text message to a single recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Pick the mailer for the given configuration: SMTP when configured,
/// console logging otherwise.
pub fn build_mailer(config: Option<EmailConfig>) -> Result<Arc<dyn Mailer>, MailError> {
    match config {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mailer enabled");
            Ok(Arc::new(SmtpMailer::new(config)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, outgoing mail will only be logged");
            Ok(Arc::new(ConsoleMailer::new(config::default_from_address())))
        }
    }
}
