// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::badges::CalendarService;

pub fn calendar_routes(state: Arc<AppConfig>) -> Router {
    // One service instance per process so the month cache outlives requests.
    let service = Arc::new(CalendarService::new(&state));

    Router::new()
        .route("/{practitioner_id}/{year}/{month}", get(handlers::get_month_badges))
        .route("/refresh", post(handlers::refresh_month))
        .layer(Extension(service))
}
