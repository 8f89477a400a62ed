// libs/schedule-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AvailabilityError;
use crate::services::availability::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct SlotQueryParams {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct BlackoutWindowParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

fn map_availability_error(e: AvailabilityError) -> AppError {
    match e {
        AvailabilityError::PractitionerNotFound => {
            AppError::NotFound("Practitioner not found".to_string())
        }
        AvailabilityError::InvalidRequest(msg) => AppError::BadRequest(msg),
        AvailabilityError::Upstream(msg) => AppError::ExternalService(msg),
    }
}

/// Bookable slots for one practitioner and date. Results are a snapshot for
/// the instant they were computed; clients polling for today should refetch
/// about once a minute.
#[axum::debug_handler]
pub async fn get_day_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(practitioner_id): Path<Uuid>,
    Query(params): Query<SlotQueryParams>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let availability = service
        .day_availability(practitioner_id, params.date, Utc::now(), auth.token())
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": availability
    })))
}

/// Blocked days for a practitioner within a date window.
#[axum::debug_handler]
pub async fn get_blocked_days(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(practitioner_id): Path<Uuid>,
    Query(params): Query<BlackoutWindowParams>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let blocked = service
        .blocked_days(practitioner_id, params.from, params.to, auth.token())
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "success": true,
        "blocked_days": blocked
    })))
}
