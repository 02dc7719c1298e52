use async_trait::async_trait;

use crate::{MailError, Mailer};

/// Development mailer: writes each message to the log instead of sending it.
pub struct ConsoleMailer {
    from_address: String,
}

impl ConsoleMailer {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(from = %self.from_address, to, subject, body, "Email (console delivery)");
        Ok(())
    }
}
