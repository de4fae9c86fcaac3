use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Public base URL the patient-facing confirmation links point at.
    pub confirmation_base_url: String,
    pub whatsapp_api_base_url: String,
    pub calendar_api_base_url: String,
    /// Upper bound for every external collaborator call (calendar, messaging).
    pub external_call_timeout_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            confirmation_base_url: env::var("CONFIRMATION_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("CONFIRMATION_BASE_URL not set, using empty value");
                    String::new()
                }),
            whatsapp_api_base_url: env::var("WHATSAPP_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_API_BASE_URL not set, using default");
                    "https://api.whatsapp.example.com/v1".to_string()
                }),
            calendar_api_base_url: env::var("CALENDAR_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("CALENDAR_API_BASE_URL not set, using default");
                    "https://www.googleapis.com/calendar/v3".to_string()
                }),
            external_call_timeout_seconds: env::var("EXTERNAL_CALL_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.confirmation_base_url.is_empty()
    }
}
