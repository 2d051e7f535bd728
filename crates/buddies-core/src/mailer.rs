use crate::error::Result;
use std::sync::Mutex;
use tracing::info;

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Outbound mail seam. Returns whether the message was actually handed
/// off; a `false` is a soft skip, an `Err` is a delivery failure.
pub trait Mailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<bool>;
}

/// Logs each message instead of delivering it. Stands in until a real
/// delivery backend is wired up.
#[derive(Debug, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<bool> {
        info!(%recipient, %subject, bytes = body.len(), "would send email");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// MemoryMailer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Test double that records every message.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentMail>>,
    pub fail_for: Option<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail deliveries to one recipient, for error-path tests.
    pub fn failing_for(recipient: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: Some(recipient.into()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<bool> {
        if self.fail_for.as_deref() == Some(recipient) {
            return Err(crate::error::BuddiesError::Mail(format!(
                "delivery refused for {recipient}"
            )));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }
        Ok(true)
    }
}
