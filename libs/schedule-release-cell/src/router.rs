// libs/schedule-release-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn schedule_release_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/release", post(handlers::release_day))
        .with_state(state)
}
