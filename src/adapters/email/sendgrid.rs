//! SendGrid adapter. Implements NotificationSender via the v3 mail send API.

use crate::domain::DomainError;
use crate::ports::NotificationSender;
use reqwest::Client;
use serde_json::json;

/// SendGrid API adapter for dispatching advisory emails.
///
/// Requires an API key with mail-send scope. `from` must be a verified
/// sender identity on the SendGrid account.
pub struct SendGridAdapter {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl SendGridAdapter {
    /// Create a new SendGrid adapter.
    ///
    /// # Arguments
    /// * `api_url` - Mail send endpoint (override for tests/proxies)
    /// * `api_key` - SendGrid API key
    /// * `from` - Verified sender address
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    fn build_payload(&self, to: &str, subject: &str, body: &str) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        })
    }
}

#[async_trait::async_trait]
impl NotificationSender for SendGridAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        let payload = self.build_payload(to, subject, body);

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Delivery(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Delivery(format!(
                "Mail API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_recipient_subject_and_body() {
        let adapter = SendGridAdapter::new(
            "https://api.sendgrid.com/v3/mail/send".to_string(),
            "key".to_string(),
            "advisor@lawnsensei.example".to_string(),
        );
        let payload = adapter.build_payload("user@example.com", "Lawn Care Notification", "water");

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "user@example.com"
        );
        assert_eq!(payload["from"]["email"], "advisor@lawnsensei.example");
        assert_eq!(payload["subject"], "Lawn Care Notification");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][0]["value"], "water");
    }
}
