// libs/confirmation-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ConfirmationError, RescheduleRequest, SetConfirmStatusRequest};
use crate::services::confirmation::ConfirmationService;

fn map_error(e: ConfirmationError) -> AppError {
    match e {
        ConfirmationError::NotFound => {
            AppError::NotFound("Confirmation link is no longer valid".to_string())
        }
        ConfirmationError::InvalidState(status) => AppError::Conflict(format!(
            "Appointment can no longer be modified (current status: {})",
            status
        )),
        ConfirmationError::ValidationError(msg) => AppError::BadRequest(msg),
        ConfirmationError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// PUBLIC SELF-SERVICE HANDLERS (authenticated by the token itself)
// ==============================================================================

#[axum::debug_handler]
pub async fn resolve_confirmation(
    State(state): State<Arc<AppConfig>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let snapshot = service.resolve(&token).await.map_err(map_error)?;

    Ok(Json(json!(snapshot)))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let message = service.confirm(&token).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let message = service.cancel(&token).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn request_reschedule(
    State(state): State<Arc<AppConfig>>,
    Path(token): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let message = service
        .request_reschedule(&token, request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

// ==============================================================================
// STAFF HANDLERS (session threaded explicitly into persistence)
// ==============================================================================

#[axum::debug_handler]
pub async fn issue_confirmation_link(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let token = service
        .tokens()
        .issue(appointment_id, Some(auth.token()))
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "link": service.tokens().confirmation_url(&token.token)
    })))
}

#[axum::debug_handler]
pub async fn resend_confirmation_link(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    let token = service
        .tokens()
        .resend(appointment_id, Some(auth.token()))
        .await
        .map_err(|e| match e {
            ConfirmationError::NotFound => {
                AppError::NotFound("No active confirmation link for this appointment".to_string())
            }
            other => map_error(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "link": service.tokens().confirmation_url(&token.token)
    })))
}

#[axum::debug_handler]
pub async fn set_confirm_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<SetConfirmStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConfirmationService::new(&state);

    service
        .set_confirm_status(appointment_id, request.status.clone(), auth.token())
        .await
        .map_err(|e| match e {
            ConfirmationError::NotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            other => map_error(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "status": request.status,
        "message": "Confirmation status updated"
    })))
}
