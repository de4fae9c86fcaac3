use std::sync::Arc;

use axum::{
    extract::Path,
    routing::get,
    Json, Router,
};
use serde_json::json;

use confirmation_cell::router::{appointment_confirmation_routes, confirmation_routes};
use schedule_release_cell::router::schedule_release_routes;
use shared_config::AppConfig;
use shared_utils::validate_rut;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Agenda Salud API is running!" }))
        .route("/rut/{rut}/validate", get(validate_rut_handler))
        .nest("/confirmations", confirmation_routes(state.clone()))
        .nest("/appointments", appointment_confirmation_routes(state.clone()))
        .nest("/schedule", schedule_release_routes(state.clone()))
}

/// Identity pre-check used by the booking front end before it looks a
/// patient up.
async fn validate_rut_handler(Path(rut): Path<String>) -> Json<serde_json::Value> {
    Json(json!({ "rut": rut, "valid": validate_rut(&rut) }))
}
