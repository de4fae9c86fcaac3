// libs/confirmation-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub professional_id: Uuid,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub modality: String,
    pub service_id: Option<Uuid>,
    pub status: ConfirmationStatus,
    pub external_calendar_event_id: Option<String>,
    pub requested_date: Option<NaiveDate>,
    pub requested_time: Option<NaiveTime>,
    pub reschedule_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Cancelled,
    RescheduleRequested,
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationStatus::Pending => write!(f, "pending"),
            ConfirmationStatus::Confirmed => write!(f, "confirmed"),
            ConfirmationStatus::Cancelled => write!(f, "cancelled"),
            ConfirmationStatus::RescheduleRequested => write!(f, "reschedule_requested"),
        }
    }
}

impl ConfirmationStatus {
    /// Self-service actions are only legal from `pending`; everything
    /// else is terminal for the patient.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConfirmationStatus::Pending)
    }
}

// ==============================================================================
// CONFIRMATION TOKEN MODELS
// ==============================================================================

/// One active token per appointment; reissuing replaces the row so old
/// links stop resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationToken {
    pub token: String,
    pub appointment_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenRegenerationPolicy {
    /// Every issue call mints a fresh token and invalidates the old one.
    AlwaysRegenerate,
    /// Issue returns the existing token while one is active.
    ReuseActive,
}

/// Tokens never expire; staff rotate them by reissuing the link.
pub const TOKEN_REGENERATION_POLICY: TokenRegenerationPolicy =
    TokenRegenerationPolicy::AlwaysRegenerate;

pub const TOKEN_LENGTH: usize = 32;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Read-only view a resolved token grants to the patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSnapshot {
    pub patient_name: String,
    pub service: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: ConfirmationStatus,
}

/// Self-service reschedule request. Dates arrive as strings so a
/// malformed value becomes a validation error rather than a decode
/// failure at the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub new_date: Option<String>,
    pub new_time: Option<String>,
    pub reason: Option<String>,
}

/// Staff override of the confirmation status, bypassing the token but
/// validated against the same transition table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetConfirmStatusRequest {
    pub status: ConfirmationStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfirmationError {
    #[error("Confirmation token not found")]
    NotFound,

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidState(ConfirmationStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
