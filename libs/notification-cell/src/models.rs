// libs/notification-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Field values a message template draws from. Built by the caller from
/// the appointment plus its patient/professional/branch lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationContext {
    pub patient_name: String,
    pub professional_name: String,
    pub branch_name: String,
    pub service_name: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub modality: String,
}

/// Per-professional messaging account, looked up from persistence and
/// passed explicitly into every dispatch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsappCredentials {
    pub account_id: String,
    pub api_token: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Messaging configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Messaging service error: {0}")]
    ExternalServiceError(String),
}
