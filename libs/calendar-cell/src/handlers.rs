// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use schedule_cell::models::BookingState;

use crate::models::CalendarError;
use crate::services::badges::CalendarService;

#[derive(Debug, Deserialize)]
pub struct BadgeQueryParams {
    pub room_id: Option<Uuid>,
    pub state: Option<BookingState>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshMonthRequest {
    pub year: i32,
    pub month: u32,
}

fn map_calendar_error(e: CalendarError) -> AppError {
    match e {
        CalendarError::InvalidMonth(month) => {
            AppError::BadRequest(format!("Invalid month: {}", month))
        }
        CalendarError::Upstream(msg) => AppError::ExternalService(msg),
    }
}

/// Per-day badges for a visible month, with adjacent months prefetched into
/// the cache.
#[axum::debug_handler]
pub async fn get_month_badges(
    Extension(service): Extension<Arc<CalendarService>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path((practitioner_id, year, month)): Path<(Uuid, i32, u32)>,
    Query(params): Query<BadgeQueryParams>,
) -> Result<Json<Value>, AppError> {
    let badges = service
        .month_badges(
            practitioner_id,
            year,
            month,
            params.room_id,
            params.state,
            auth.token(),
        )
        .await
        .map_err(map_calendar_error)?;

    Ok(Json(json!({
        "success": true,
        "year": year,
        "month": month,
        "badges": badges.values().collect::<Vec<_>>()
    })))
}

/// Evict a month's cached badges after a booking mutation.
#[axum::debug_handler]
pub async fn refresh_month(
    Extension(service): Extension<Arc<CalendarService>>,
    Json(request): Json<RefreshMonthRequest>,
) -> Result<Json<Value>, AppError> {
    if !(1..=12).contains(&request.month) {
        return Err(AppError::BadRequest(format!("Invalid month: {}", request.month)));
    }

    service.refresh_month(request.year, request.month);

    Ok(Json(json!({
        "success": true,
        "message": "Month cache evicted"
    })))
}
