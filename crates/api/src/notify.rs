//! Purchase notification trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Price;

/// Subject line used for every purchase summary.
pub const SUBJECT: &str = "The summary of your purchase";

/// Notification delivery failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// A delivered purchase summary.
#[derive(Debug, Clone)]
pub struct PurchaseSummary {
    /// Recipient address.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
}

/// Trait for sending the post-purchase summary.
///
/// Callers treat delivery as best-effort: a failure is logged and never
/// fails the request that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a purchase summary for the given cart total to the address.
    async fn purchase_summary(&self, email: &str, total: Price) -> Result<(), NotifyError>;
}

fn summary_message(total: Price) -> String {
    format!("You have made a purchase of {total}€.")
}

/// Notifier that writes summaries to the application log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn purchase_summary(&self, email: &str, total: Price) -> Result<(), NotifyError> {
        tracing::info!(
            email,
            subject = SUBJECT,
            message = %summary_message(total),
            "purchase summary sent"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryNotifierState {
    sent: Vec<PurchaseSummary>,
    fail_on_send: bool,
}

/// In-memory notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    state: Arc<RwLock<InMemoryNotifierState>>,
}

impl InMemoryNotifier {
    /// Creates a new in-memory notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the notifier to fail on the next send.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the summaries delivered so far.
    pub fn sent(&self) -> Vec<PurchaseSummary> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn purchase_summary(&self, email: &str, total: Price) -> Result<(), NotifyError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(NotifyError("mail relay unreachable".to_string()));
        }

        state.sent.push(PurchaseSummary {
            email: email.to_string(),
            subject: SUBJECT.to_string(),
            message: summary_message(total),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_records_sent_summaries() {
        let notifier = InMemoryNotifier::new();

        notifier
            .purchase_summary("ada@example.com", Price::new(Decimal::new(940, 2)))
            .await
            .unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].email, "ada@example.com");
        assert_eq!(sent[0].subject, "The summary of your purchase");
        assert_eq!(sent[0].message, "You have made a purchase of 9.40€.");
    }

    #[tokio::test]
    async fn test_fail_on_send() {
        let notifier = InMemoryNotifier::new();
        notifier.set_fail_on_send(true);

        let result = notifier
            .purchase_summary("ada@example.com", Price::zero())
            .await;

        assert!(result.is_err());
        assert!(notifier.sent().is_empty());
    }
}
