use std::sync::Arc;

use axum::{routing::get, Router};

use booking_policy_cell::router::policy_routes;
use calendar_cell::router::calendar_routes;
use schedule_cell::router::availability_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Perla Dental API is running!" }))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/calendar", calendar_routes(state.clone()))
        .nest("/policy", policy_routes(state))
}
