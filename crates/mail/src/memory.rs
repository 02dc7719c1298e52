use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{MailError, Mailer};

/// A message captured by [`MemoryMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every message in memory. Used by tests to read confirmation
/// codes back out of the "outbox".
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent message sent to `to`, if any.
    pub fn last_to(&self, to: &str) -> Option<SentMail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages_in_order() {
        let mailer = MemoryMailer::new();
        mailer.send("a@example.com", "one", "first").await.unwrap();
        mailer.send("b@example.com", "two", "second").await.unwrap();
        mailer.send("a@example.com", "three", "third").await.unwrap();

        assert_eq!(mailer.sent().len(), 3);
        let last = mailer.last_to("a@example.com").unwrap();
        assert_eq!(last.subject, "three");
        assert!(mailer.last_to("c@example.com").is_none());
    }

    #[tokio::test]
    async fn console_mailer_never_fails() {
        let mailer = crate::ConsoleMailer::new("noreply@yamdb.local");
        assert!(mailer.send("x@example.com", "s", "b").await.is_ok());
    }
}
