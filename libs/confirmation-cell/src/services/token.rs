// libs/confirmation-cell/src/services/token.rs
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentSnapshot, ConfirmationError, ConfirmationToken,
    TokenRegenerationPolicy, TOKEN_LENGTH, TOKEN_REGENERATION_POLICY,
};

pub struct ConfirmationTokenService {
    supabase: Arc<SupabaseClient>,
    confirmation_base_url: String,
}

impl ConfirmationTokenService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            confirmation_base_url: config.confirmation_base_url.clone(),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, config: &AppConfig) -> Self {
        Self {
            supabase,
            confirmation_base_url: config.confirmation_base_url.clone(),
        }
    }

    /// Mint the active token for an appointment. Under the
    /// always-regenerate policy any previous token row is removed first,
    /// so links issued earlier stop resolving.
    pub async fn issue(
        &self,
        appointment_id: uuid::Uuid,
        auth_token: Option<&str>,
    ) -> Result<ConfirmationToken, ConfirmationError> {
        if TOKEN_REGENERATION_POLICY == TokenRegenerationPolicy::ReuseActive {
            if let Some(existing) = self.find_by_appointment(appointment_id, auth_token).await? {
                debug!("Reusing active token for appointment {}", appointment_id);
                return Ok(existing);
            }
        }

        self.supabase
            .execute(
                Method::DELETE,
                &format!(
                    "/rest/v1/confirmation_tokens?appointment_id=eq.{}",
                    appointment_id
                ),
                auth_token,
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        let token_value = generate_token_value();

        let inserted: Vec<ConfirmationToken> = self
            .supabase
            .request(
                Method::POST,
                "/rest/v1/confirmation_tokens",
                auth_token,
                Some(json!({
                    "token": token_value,
                    "appointment_id": appointment_id,
                })),
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        let token = inserted
            .into_iter()
            .next()
            .ok_or_else(|| ConfirmationError::DatabaseError("token insert returned no row".to_string()))?;

        info!("Issued confirmation token for appointment {}", appointment_id);
        Ok(token)
    }

    /// Return the currently active token without regenerating it.
    pub async fn resend(
        &self,
        appointment_id: uuid::Uuid,
        auth_token: Option<&str>,
    ) -> Result<ConfirmationToken, ConfirmationError> {
        self.find_by_appointment(appointment_id, auth_token)
            .await?
            .ok_or(ConfirmationError::NotFound)
    }

    /// Resolve a token into the patient-facing appointment snapshot.
    /// Unknown and stale tokens (appointment already released) both
    /// resolve to `NotFound`.
    pub async fn resolve(&self, token: &str) -> Result<AppointmentSnapshot, ConfirmationError> {
        let appointment = self.appointment_for_token(token).await?;

        let patient_name = self.lookup_name("patients", "full_name", appointment.patient_id).await?;
        let service = match appointment.service_id {
            Some(service_id) => Some(self.lookup_name("services", "name", service_id).await?),
            None => None,
        };

        Ok(AppointmentSnapshot {
            patient_name,
            service,
            date: appointment.date,
            time: appointment.time,
            status: appointment.status,
        })
    }

    /// Look up the full appointment a token points at, for the action
    /// endpoints that mutate status.
    pub async fn appointment_for_token(
        &self,
        token: &str,
    ) -> Result<Appointment, ConfirmationError> {
        let row = self.find_token(token).await?.ok_or(ConfirmationError::NotFound)?;

        let appointments: Vec<Appointment> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/appointments?id=eq.{}", row.appointment_id),
                None,
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        appointments.into_iter().next().ok_or(ConfirmationError::NotFound)
    }

    /// Public confirmation URL for a token.
    pub fn confirmation_url(&self, token: &str) -> String {
        format!("{}/confirmar/{}", self.confirmation_base_url, token)
    }

    async fn find_token(&self, token: &str) -> Result<Option<ConfirmationToken>, ConfirmationError> {
        let rows: Vec<ConfirmationToken> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/confirmation_tokens?token=eq.{}", token),
                None,
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    async fn find_by_appointment(
        &self,
        appointment_id: uuid::Uuid,
        auth_token: Option<&str>,
    ) -> Result<Option<ConfirmationToken>, ConfirmationError> {
        let rows: Vec<ConfirmationToken> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/confirmation_tokens?appointment_id=eq.{}",
                    appointment_id
                ),
                auth_token,
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    async fn lookup_name(
        &self,
        table: &str,
        column: &str,
        id: uuid::Uuid,
    ) -> Result<String, ConfirmationError> {
        let rows: Vec<serde_json::Value> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/{}?id=eq.{}&select={}", table, id, column),
                None,
                None,
            )
            .await
            .map_err(|e| ConfirmationError::DatabaseError(e.to_string()))?;

        rows.first()
            .and_then(|row| row.get(column))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ConfirmationError::DatabaseError(format!("missing {} row for {}", table, id))
            })
    }
}

fn generate_token_value() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_opaque_and_unique() {
        let a = generate_token_value();
        let b = generate_token_value();

        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
