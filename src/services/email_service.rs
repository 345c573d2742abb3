// src/services/email_service.rs

//! Outbound notification seam. Delivery is best-effort and fire-and-forget:
//! callers log a failed send and move on, they never roll anything back.

use crate::errors::Result as AppResult;
use tracing::info;

pub trait Notifier: Send + Sync {
  fn send(&self, to: &str, subject: &str, body: &str) -> impl std::future::Future<Output = AppResult<()>> + Send;
}

/// Development/test sender that logs instead of talking to a provider.
#[derive(Debug, Clone)]
pub struct MockEmailSender {
  pub sender: String,
}

impl MockEmailSender {
  pub fn new(sender: impl Into<String>) -> Self {
    Self { sender: sender.into() }
  }
}

impl Notifier for MockEmailSender {
  async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
    info!(
      "Simulating sending email: To='{}', From='{}', Subject='{}'",
      to, self.sender, subject
    );
    tokio::time::sleep(std::time::Duration::from_millis(20)).await; // Simulate network latency

    let body_preview = body.chars().take(50).collect::<String>();
    let message_id = format!("mock_email_{}", uuid::Uuid::new_v4());
    info!(
      "Mock email sent successfully. Message ID: {}, preview: '{}'",
      message_id, body_preview
    );
    Ok(())
  }
}
