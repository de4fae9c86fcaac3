// libs/schedule-release-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ReleaseError, ReleaseRequest};
use crate::services::release::ScheduleReleaseService;

#[axum::debug_handler]
pub async fn release_day(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ReleaseRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleReleaseService::new(&state);

    let result = service
        .release_day(request, auth.token())
        .await
        .map_err(|e| match e {
            ReleaseError::ProfessionalNotFound => {
                AppError::NotFound("Professional not found".to_string())
            }
            ReleaseError::ValidationError(msg) => AppError::BadRequest(msg),
            ReleaseError::DatabaseError(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "result": result
    })))
}
