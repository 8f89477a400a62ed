// libs/booking-policy-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn policy_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/evaluate", post(handlers::evaluate_booking))
        .route("/reschedule-check", post(handlers::check_reschedule))
        .with_state(state)
}
