// libs/schedule-release-cell/src/services/calendar.rs
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::CalendarError;

/// External calendar client used for best-effort event cleanup during
/// a day release. The OAuth session is per professional and passed on
/// every call.
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    call_timeout: Duration,
}

impl GoogleCalendarClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.calendar_api_base_url.clone(),
            call_timeout: Duration::from_secs(config.external_call_timeout_seconds),
        }
    }

    /// Delete one external event. 404/410 mean the event is already
    /// gone, which is what cleanup wanted anyway.
    pub async fn delete_event(
        &self,
        access_token: &str,
        external_event_id: &str,
    ) -> Result<(), CalendarError> {
        let url = format!(
            "{}/calendars/primary/events/{}",
            self.base_url, external_event_id
        );
        debug!("Deleting external calendar event {}", external_event_id);

        let request = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send();

        let response = timeout(self.call_timeout, request)
            .await
            .map_err(|_| {
                CalendarError::ExternalServiceError(format!(
                    "calendar call timed out after {}s",
                    self.call_timeout.as_secs()
                ))
            })?
            .map_err(|e| CalendarError::ExternalServiceError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            info!("External event {} already removed", external_event_id);
            return Ok(());
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Calendar event deletion failed: {} - {}", status, error_text);
            return Err(CalendarError::ExternalServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        info!("Deleted external calendar event {}", external_event_id);
        Ok(())
    }
}
