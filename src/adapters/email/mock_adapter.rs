//! Mock mail adapter for running without mail credentials.
//!
//! Logs the advisory instead of delivering it.

use crate::domain::DomainError;
use crate::ports::NotificationSender;
use std::time::Duration;
use tracing::info;

/// Mock notification sender.
///
/// Accepts every send and logs it. Simulates delivery latency with a
/// configurable delay.
pub struct MockMailAdapter {
    /// Simulated delivery delay in milliseconds.
    delay_ms: u64,
}

impl MockMailAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockMailAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationSender for MockMailAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        info!(to, subject, body, "[MOCK] advisory email (not delivered)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_accepts_sends() {
        let adapter = MockMailAdapter::with_delay(10);
        adapter
            .send("user@example.com", "Lawn Care Notification", "water today")
            .await
            .unwrap();
    }
}
