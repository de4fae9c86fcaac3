// libs/schedule-release-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// One bulk release of a professional's day. Transient input; nothing
/// here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub professional_id: Uuid,
    pub date: NaiveDate,
    /// When set, the date is also blocked against future bookings.
    pub block_day: bool,
    /// Caller-supplied template; falls back to the professional's
    /// default confirmation message.
    pub custom_message: Option<String>,
}

/// What the released appointment looked like before deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasedAppointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseCounts {
    pub released: u32,
    pub release_failed: u32,
    pub calendar_cleanup_failed: u32,
    pub notifications_sent: u32,
    pub notifications_failed: u32,
    pub notifications_skipped: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResult {
    pub released_appointments: Vec<ReleasedAppointment>,
    pub counts: ReleaseCounts,
}

// ==============================================================================
// PER-ITEM OUTCOME MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarCleanupOutcome {
    /// No external event was attached.
    NotNeeded,
    Cleaned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationSkipReason {
    /// No template or no messaging credentials configured.
    ConfigurationMissing,
    MissingPhoneNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Sent,
    Failed(String),
    Skipped(NotificationSkipReason),
}

/// Result of one independent unit of work in the release batch. The
/// batch is a fold over these; no variant can abort its siblings.
#[derive(Debug, Clone)]
pub enum AppointmentReleaseOutcome {
    Released {
        snapshot: ReleasedAppointment,
        calendar: CalendarCleanupOutcome,
        notification: NotificationOutcome,
    },
    ReleaseFailed {
        appointment_id: Uuid,
        error: String,
    },
}

impl ReleaseResult {
    pub fn from_outcomes(outcomes: Vec<AppointmentReleaseOutcome>) -> Self {
        let mut counts = ReleaseCounts::default();
        let mut released_appointments = Vec::new();

        for outcome in outcomes {
            match outcome {
                AppointmentReleaseOutcome::Released {
                    snapshot,
                    calendar,
                    notification,
                } => {
                    counts.released += 1;
                    released_appointments.push(snapshot);

                    if let CalendarCleanupOutcome::Failed(_) = calendar {
                        counts.calendar_cleanup_failed += 1;
                    }

                    match notification {
                        NotificationOutcome::Sent => counts.notifications_sent += 1,
                        NotificationOutcome::Failed(_) => counts.notifications_failed += 1,
                        NotificationOutcome::Skipped(_) => counts.notifications_skipped += 1,
                    }
                }
                AppointmentReleaseOutcome::ReleaseFailed { .. } => {
                    counts.release_failed += 1;
                }
            }
        }

        Self {
            released_appointments,
            counts,
        }
    }
}

// ==============================================================================
// COLLABORATOR ROW MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub full_name: String,
    pub default_confirmation_message: Option<String>,
    pub whatsapp_account_id: Option<String>,
    pub whatsapp_api_token: Option<String>,
    pub calendar_access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub rut: Option<String>,
    pub phone: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReleaseError {
    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar service error: {0}")]
    ExternalServiceError(String),
}
