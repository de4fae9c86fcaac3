// libs/confirmation-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Patient-facing routes: the single-use token in the path is the only
/// credential.
pub fn confirmation_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{token}", get(handlers::resolve_confirmation))
        .route("/{token}/confirm", post(handlers::confirm_appointment))
        .route("/{token}/cancel", post(handlers::cancel_appointment))
        .route("/{token}/reschedule", post(handlers::request_reschedule))
        .with_state(state)
}

/// Staff-facing routes addressed by appointment id; the bearer session
/// is threaded into every persistence call.
pub fn appointment_confirmation_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/{appointment_id}/confirmation-link",
            post(handlers::issue_confirmation_link),
        )
        .route(
            "/{appointment_id}/confirmation-link/resend",
            post(handlers::resend_confirmation_link),
        )
        .route(
            "/{appointment_id}/confirmation-status",
            patch(handlers::set_confirm_status),
        )
        .with_state(state)
}
