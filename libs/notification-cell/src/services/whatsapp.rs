// libs/notification-cell/src/services/whatsapp.rs
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{NotificationError, WhatsappCredentials};

/// Outbound messaging gateway client. Credentials are per professional
/// and supplied on every call; only the base URL and timeout are shared.
pub struct WhatsappClient {
    client: Client,
    base_url: String,
    call_timeout: Duration,
}

impl WhatsappClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.whatsapp_api_base_url.clone(),
            call_timeout: Duration::from_secs(config.external_call_timeout_seconds),
        }
    }

    /// Dispatch one text message. A timeout counts as any other
    /// failure of this call; it never escalates past the caller.
    pub async fn send_message(
        &self,
        credentials: &WhatsappCredentials,
        phone_number: &str,
        text: &str,
    ) -> Result<(), NotificationError> {
        let url = format!("{}/accounts/{}/messages", self.base_url, credentials.account_id);
        debug!("Dispatching message via {}", url);

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", credentials.api_token))
            .json(&json!({
                "to": phone_number,
                "body": text,
            }))
            .send();

        let response = timeout(self.call_timeout, request)
            .await
            .map_err(|_| {
                NotificationError::ExternalServiceError(format!(
                    "message dispatch timed out after {}s",
                    self.call_timeout.as_secs()
                ))
            })?
            .map_err(|e| NotificationError::ExternalServiceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Message dispatch failed: {} - {}", status, error_text);
            return Err(NotificationError::ExternalServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        info!("Message dispatched to account {}", credentials.account_id);
        Ok(())
    }
}
