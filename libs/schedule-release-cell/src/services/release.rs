// libs/schedule-release-cell/src/services/release.rs
use futures::future::join_all;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use confirmation_cell::models::Appointment;
use confirmation_cell::ConfirmationTokenService;
use notification_cell::models::{NotificationContext, WhatsappCredentials};
use notification_cell::{template, WhatsappClient};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AppointmentReleaseOutcome, CalendarCleanupOutcome, NotificationOutcome,
    NotificationSkipReason, Patient, Professional, ReleaseError, ReleaseRequest, ReleaseResult,
    ReleasedAppointment,
};
use crate::services::calendar::GoogleCalendarClient;

pub struct ScheduleReleaseService {
    supabase: Arc<SupabaseClient>,
    calendar: GoogleCalendarClient,
    whatsapp: WhatsappClient,
    tokens: ConfirmationTokenService,
}

impl ScheduleReleaseService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let tokens = ConfirmationTokenService::with_client(Arc::clone(&supabase), config);

        Self {
            supabase,
            calendar: GoogleCalendarClient::new(config),
            whatsapp: WhatsappClient::new(config),
            tokens,
        }
    }

    /// Release every live appointment of one professional on one date.
    /// Each appointment is an independent unit of work; only the
    /// queries that precede the batch can fail the whole call.
    pub async fn release_day(
        &self,
        request: ReleaseRequest,
        auth_token: &str,
    ) -> Result<ReleaseResult, ReleaseError> {
        info!(
            "Releasing schedule for professional {} on {} (block_day: {})",
            request.professional_id, request.date, request.block_day
        );

        let professional = self
            .fetch_professional(request.professional_id, auth_token)
            .await?;

        if request.block_day {
            self.block_date(request.professional_id, request.date, auth_token)
                .await?;
        }

        // the matching set is queried inside the call, so a concurrent
        // retry of the same release works from current rows
        let appointments = self
            .fetch_releasable_appointments(request.professional_id, request.date, auth_token)
            .await?;

        let template_text = request
            .custom_message
            .clone()
            .or_else(|| professional.default_confirmation_message.clone());

        let units = appointments.into_iter().map(|appointment| {
            self.process_appointment(appointment, &professional, template_text.as_deref(), auth_token)
        });
        let outcomes = join_all(units).await;

        let result = ReleaseResult::from_outcomes(outcomes);
        info!(
            "Schedule release finished: {} released, {} failed, {} calendar cleanups failed, {} notified, {} notifications failed, {} skipped",
            result.counts.released,
            result.counts.release_failed,
            result.counts.calendar_cleanup_failed,
            result.counts.notifications_sent,
            result.counts.notifications_failed,
            result.counts.notifications_skipped,
        );

        Ok(result)
    }

    /// One unit of work: delete, then best-effort calendar cleanup,
    /// then best-effort notification. Every failure is captured in the
    /// returned outcome; nothing propagates to sibling items.
    async fn process_appointment(
        &self,
        appointment: Appointment,
        professional: &Professional,
        template_text: Option<&str>,
        auth_token: &str,
    ) -> AppointmentReleaseOutcome {
        let snapshot = ReleasedAppointment {
            appointment_id: appointment.id,
            patient_id: appointment.patient_id,
            date: appointment.date,
            time: appointment.time,
        };

        if let Err(e) = self
            .supabase
            .execute(
                Method::DELETE,
                &format!("/rest/v1/appointments?id=eq.{}", appointment.id),
                Some(auth_token),
                None,
            )
            .await
        {
            warn!("Failed to release appointment {}: {}", appointment.id, e);
            return AppointmentReleaseOutcome::ReleaseFailed {
                appointment_id: appointment.id,
                error: e.to_string(),
            };
        }

        let calendar = self.cleanup_calendar_event(&appointment, professional).await;
        let notification = self
            .notify_patient(&appointment, professional, template_text, auth_token)
            .await;

        AppointmentReleaseOutcome::Released {
            snapshot,
            calendar,
            notification,
        }
    }

    /// The appointment is already gone from the system of record; this
    /// is hygiene only.
    async fn cleanup_calendar_event(
        &self,
        appointment: &Appointment,
        professional: &Professional,
    ) -> CalendarCleanupOutcome {
        let Some(event_id) = appointment.external_calendar_event_id.as_deref() else {
            return CalendarCleanupOutcome::NotNeeded;
        };

        let Some(access_token) = professional.calendar_access_token.as_deref() else {
            warn!(
                "Appointment {} has external event but professional {} has no calendar session",
                appointment.id, professional.id
            );
            return CalendarCleanupOutcome::Failed("no calendar session configured".to_string());
        };

        match self.calendar.delete_event(access_token, event_id).await {
            Ok(()) => CalendarCleanupOutcome::Cleaned,
            Err(e) => {
                warn!(
                    "Calendar cleanup failed for appointment {}: {}",
                    appointment.id, e
                );
                CalendarCleanupOutcome::Failed(e.to_string())
            }
        }
    }

    async fn notify_patient(
        &self,
        appointment: &Appointment,
        professional: &Professional,
        template_text: Option<&str>,
        auth_token: &str,
    ) -> NotificationOutcome {
        let Some(template_text) = template_text else {
            return NotificationOutcome::Skipped(NotificationSkipReason::ConfigurationMissing);
        };

        let credentials = match (
            professional.whatsapp_account_id.as_deref(),
            professional.whatsapp_api_token.as_deref(),
        ) {
            (Some(account_id), Some(api_token)) => WhatsappCredentials {
                account_id: account_id.to_string(),
                api_token: api_token.to_string(),
            },
            _ => {
                return NotificationOutcome::Skipped(NotificationSkipReason::ConfigurationMissing)
            }
        };

        let patient = match self.fetch_patient(appointment.patient_id, auth_token).await {
            Ok(patient) => patient,
            Err(e) => return NotificationOutcome::Failed(e.to_string()),
        };

        let Some(phone) = patient.phone.as_deref() else {
            return NotificationOutcome::Skipped(NotificationSkipReason::MissingPhoneNumber);
        };

        let context = match self
            .build_context(appointment, professional, &patient, auth_token)
            .await
        {
            Ok(context) => context,
            Err(e) => return NotificationOutcome::Failed(e.to_string()),
        };

        // only pay for token minting when the template asks for a link
        let link = if template::needs_confirmation_link(template_text) {
            match self.tokens.issue(appointment.id, Some(auth_token)).await {
                Ok(token) => Some(self.tokens.confirmation_url(&token.token)),
                Err(e) => {
                    warn!(
                        "Could not mint confirmation link for appointment {}: {}",
                        appointment.id, e
                    );
                    None
                }
            }
        } else {
            None
        };

        let message = template::render(template_text, &context, link.as_deref());

        match self.whatsapp.send_message(&credentials, phone, &message).await {
            Ok(()) => NotificationOutcome::Sent,
            Err(e) => {
                warn!(
                    "Notification dispatch failed for appointment {}: {}",
                    appointment.id, e
                );
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }

    async fn build_context(
        &self,
        appointment: &Appointment,
        professional: &Professional,
        patient: &Patient,
        auth_token: &str,
    ) -> Result<NotificationContext, ReleaseError> {
        let branch_name = self
            .lookup_name("branches", appointment.branch_id, auth_token)
            .await?;
        let service_name = match appointment.service_id {
            Some(service_id) => {
                Some(self.lookup_name("services", service_id, auth_token).await?)
            }
            None => None,
        };

        Ok(NotificationContext {
            patient_name: patient.full_name.clone(),
            professional_name: professional.full_name.clone(),
            branch_name,
            service_name,
            date: appointment.date,
            time: appointment.time,
            modality: appointment.modality.clone(),
        })
    }

    async fn fetch_professional(
        &self,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Professional, ReleaseError> {
        let rows: Vec<Professional> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/professionals?id=eq.{}", professional_id),
                Some(auth_token),
                None,
            )
            .await
            .map_err(|e| ReleaseError::DatabaseError(e.to_string()))?;

        rows.into_iter().next().ok_or(ReleaseError::ProfessionalNotFound)
    }

    /// Cancelled rows are already dead; everything else on the date
    /// still holds a live slot and must be released.
    async fn fetch_releasable_appointments(
        &self,
        professional_id: Uuid,
        date: chrono::NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, ReleaseError> {
        self.supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/appointments?professional_id=eq.{}&date=eq.{}&status=neq.cancelled",
                    professional_id, date
                ),
                Some(auth_token),
                None,
            )
            .await
            .map_err(|e| ReleaseError::DatabaseError(e.to_string()))
    }

    async fn block_date(
        &self,
        professional_id: Uuid,
        date: chrono::NaiveDate,
        auth_token: &str,
    ) -> Result<(), ReleaseError> {
        self.supabase
            .execute(
                Method::POST,
                "/rest/v1/blocked_dates",
                Some(auth_token),
                Some(json!({
                    "professional_id": professional_id,
                    "date": date,
                })),
            )
            .await
            .map_err(|e| ReleaseError::DatabaseError(e.to_string()))
    }

    async fn fetch_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Patient, ReleaseError> {
        let rows: Vec<Patient> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/patients?id=eq.{}", patient_id),
                Some(auth_token),
                None,
            )
            .await
            .map_err(|e| ReleaseError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| ReleaseError::DatabaseError(format!("missing patient {}", patient_id)))
    }

    async fn lookup_name(
        &self,
        table: &str,
        id: Uuid,
        auth_token: &str,
    ) -> Result<String, ReleaseError> {
        let rows: Vec<serde_json::Value> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/{}?id=eq.{}&select=name", table, id),
                Some(auth_token),
                None,
            )
            .await
            .map_err(|e| ReleaseError::DatabaseError(e.to_string()))?;

        rows.first()
            .and_then(|row| row.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ReleaseError::DatabaseError(format!("missing {} row for {}", table, id)))
    }
}
