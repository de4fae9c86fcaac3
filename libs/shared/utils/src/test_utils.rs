use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub confirmation_base_url: String,
    pub whatsapp_api_base_url: String,
    pub calendar_api_base_url: String,
    pub external_call_timeout_seconds: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            confirmation_base_url: "https://agenda.example.com".to_string(),
            whatsapp_api_base_url: "http://localhost:54322".to_string(),
            calendar_api_base_url: "http://localhost:54323".to_string(),
            external_call_timeout_seconds: 2,
        }
    }
}

impl TestConfig {
    /// Point every collaborator base URL at one wiremock server.
    pub fn with_mock_server(base_url: &str) -> Self {
        Self {
            supabase_url: base_url.to_string(),
            whatsapp_api_base_url: format!("{}/whatsapp", base_url),
            calendar_api_base_url: format!("{}/calendar", base_url),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            confirmation_base_url: self.confirmation_base_url.clone(),
            whatsapp_api_base_url: self.whatsapp_api_base_url.clone(),
            calendar_api_base_url: self.calendar_api_base_url.clone(),
            external_call_timeout_seconds: self.external_call_timeout_seconds,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn appointment_row(
        id: Uuid,
        patient_id: Uuid,
        professional_id: Uuid,
        status: &str,
        external_calendar_event_id: Option<&str>,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "professional_id": professional_id,
            "branch_id": Uuid::new_v4(),
            "date": "2026-09-15",
            "time": "10:30:00",
            "modality": "presencial",
            "service_id": null,
            "status": status,
            "external_calendar_event_id": external_calendar_event_id,
            "requested_date": null,
            "requested_time": null,
            "reschedule_reason": null,
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-01T00:00:00Z"
        })
    }

    pub fn patient_row(id: Uuid, full_name: &str, phone: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "rut": "12345678-5",
            "phone": phone
        })
    }

    pub fn professional_row(
        id: Uuid,
        full_name: &str,
        default_message: Option<&str>,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "default_confirmation_message": default_message,
            "whatsapp_account_id": "acct-123",
            "whatsapp_api_token": "wa-token",
            "calendar_access_token": "cal-token"
        })
    }

    pub fn professional_row_without_credentials(id: Uuid, full_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "default_confirmation_message": "Hola {paciente}",
            "whatsapp_account_id": null,
            "whatsapp_api_token": null,
            "calendar_access_token": null
        })
    }

    pub fn token_row(token: &str, appointment_id: Uuid) -> serde_json::Value {
        json!({
            "token": token,
            "appointment_id": appointment_id,
            "created_at": "2026-08-01T00:00:00Z"
        })
    }

    pub fn service_row(id: Uuid, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name
        })
    }

    pub fn branch_row(id: Uuid, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name
        })
    }
}
