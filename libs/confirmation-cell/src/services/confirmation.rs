// libs/confirmation-cell/src/services/confirmation.rs
use chrono::{NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AppointmentSnapshot, ConfirmationError, ConfirmationStatus, RescheduleRequest,
};
use crate::services::lifecycle::ConfirmationLifecycleService;
use crate::services::token::ConfirmationTokenService;

pub struct ConfirmationService {
    supabase: Arc<SupabaseClient>,
    lifecycle: ConfirmationLifecycleService,
    tokens: ConfirmationTokenService,
}

impl ConfirmationService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let tokens = ConfirmationTokenService::with_client(Arc::clone(&supabase), config);

        Self {
            supabase,
            lifecycle: ConfirmationLifecycleService::new(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &ConfirmationTokenService {
        &self.tokens
    }

    /// Read-only snapshot behind a token. Repeated calls without an
    /// intervening action return the same view.
    pub async fn resolve(&self, token: &str) -> Result<AppointmentSnapshot, ConfirmationError> {
        self.tokens.resolve(token).await
    }

    pub async fn confirm(&self, token: &str) -> Result<String, ConfirmationError> {
        self.apply_transition(token, ConfirmationStatus::Confirmed, None)
            .await?;
        Ok("Cita confirmada".to_string())
    }

    pub async fn cancel(&self, token: &str) -> Result<String, ConfirmationError> {
        self.apply_transition(token, ConfirmationStatus::Cancelled, None)
            .await?;
        Ok("Cita anulada".to_string())
    }

    pub async fn request_reschedule(
        &self,
        token: &str,
        request: RescheduleRequest,
    ) -> Result<String, ConfirmationError> {
        let (new_date, new_time) = parse_reschedule_fields(&request)?;

        self.apply_transition(
            token,
            ConfirmationStatus::RescheduleRequested,
            Some(json!({
                "requested_date": new_date,
                "requested_time": new_time,
                "reschedule_reason": request.reason,
            })),
        )
        .await?;

        Ok("Solicitud de reagendamiento registrada".to_string())
    }

    /// Staff override: same transition table, addressed by appointment
    /// id instead of token, with the caller's session threaded through.
    pub async fn set_confirm_status(
        &self,
        appointment_id: Uuid,
        new_status: ConfirmationStatus,
        auth_token: &str,
    ) -> Result<(), ConfirmationError> {
        let appointments: Vec<crate::models::Appointment> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/appointments?id=eq.{}", appointment_id),
                Some(auth_token),
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        let appointment = appointments.into_iter().next().ok_or(ConfirmationError::NotFound)?;

        self.lifecycle
            .validate_status_transition(&appointment.status, &new_status)?;

        self.patch_appointment(
            appointment.id,
            json!({
                "status": new_status,
                "updated_at": Utc::now(),
            }),
            Some(auth_token),
        )
        .await?;

        info!(
            "Staff set appointment {} confirmation status to {}",
            appointment_id, new_status
        );
        Ok(())
    }

    /// Validate then mutate. Validation failures leave the row
    /// untouched.
    async fn apply_transition(
        &self,
        token: &str,
        new_status: ConfirmationStatus,
        extra_fields: Option<Value>,
    ) -> Result<(), ConfirmationError> {
        let appointment = self.tokens.appointment_for_token(token).await?;

        self.lifecycle
            .validate_status_transition(&appointment.status, &new_status)?;

        let mut patch = json!({
            "status": new_status,
            "updated_at": Utc::now(),
        });
        if let Some(Value::Object(extra)) = extra_fields {
            if let Value::Object(map) = &mut patch {
                map.extend(extra);
            }
        }

        self.patch_appointment(appointment.id, patch, None).await?;

        info!(
            "Appointment {} moved to {} via confirmation token",
            appointment.id, new_status
        );
        Ok(())
    }

    async fn patch_appointment(
        &self,
        appointment_id: Uuid,
        body: Value,
        auth_token: Option<&str>,
    ) -> Result<(), ConfirmationError> {
        self.supabase
            .execute(
                Method::PATCH,
                &format!("/rest/v1/appointments?id=eq.{}", appointment_id),
                auth_token,
                Some(body),
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))
    }
}

fn parse_reschedule_fields(
    request: &RescheduleRequest,
) -> Result<(NaiveDate, NaiveTime), ConfirmationError> {
    let date_str = request
        .new_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ConfirmationError::ValidationError("new_date is required".to_string()))?;
    let time_str = request
        .new_time
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ConfirmationError::ValidationError("new_time is required".to_string()))?;

    let new_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ConfirmationError::ValidationError("new_date must be YYYY-MM-DD".to_string()))?;

    let new_time = NaiveTime::parse_from_str(time_str, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M:%S"))
        .map_err(|_| ConfirmationError::ValidationError("new_time must be HH:MM".to_string()))?;

    Ok((new_date, new_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: Option<&str>, time: Option<&str>) -> RescheduleRequest {
        RescheduleRequest {
            new_date: date.map(|s| s.to_string()),
            new_time: time.map(|s| s.to_string()),
            reason: Some("viaje".to_string()),
        }
    }

    #[test]
    fn reschedule_requires_both_fields() {
        assert!(parse_reschedule_fields(&request(None, Some("10:00"))).is_err());
        assert!(parse_reschedule_fields(&request(Some("2026-09-20"), None)).is_err());
        assert!(parse_reschedule_fields(&request(Some(""), Some("10:00"))).is_err());
    }

    #[test]
    fn reschedule_rejects_malformed_values() {
        assert!(parse_reschedule_fields(&request(Some("20-09-2026"), Some("10:00"))).is_err());
        assert!(parse_reschedule_fields(&request(Some("2026-09-20"), Some("25:99"))).is_err());
    }

    #[test]
    fn reschedule_accepts_hm_and_hms_times() {
        assert!(parse_reschedule_fields(&request(Some("2026-09-20"), Some("10:00"))).is_ok());
        assert!(parse_reschedule_fields(&request(Some("2026-09-20"), Some("10:00:00"))).is_ok());
    }
}
