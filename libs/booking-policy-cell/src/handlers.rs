// libs/booking-policy-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{EvaluateBookingRequest, PolicyError, RescheduleCheckRequest};
use crate::services::decision::PolicyService;

fn map_policy_error(e: PolicyError) -> AppError {
    match e {
        PolicyError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        PolicyError::PractitionerNotFound => {
            AppError::NotFound("Practitioner not found".to_string())
        }
        PolicyError::Upstream(msg) => AppError::ExternalService(msg),
    }
}

/// Full admission decision for a candidate booking. Violations are decision
/// outputs rendered for the user, not errors.
#[axum::debug_handler]
pub async fn evaluate_booking(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<EvaluateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PolicyService::new(&state);

    let decision = service
        .evaluate(request, auth.token())
        .await
        .map_err(map_policy_error)?;

    Ok(Json(json!({
        "success": true,
        "admitted": decision.admitted,
        "initial_state": decision.initial_state,
        "violations": decision.violations.iter().map(|v| v.to_payload()).collect::<Vec<_>>()
    })))
}

/// Reschedule admission for an existing appointment.
#[axum::debug_handler]
pub async fn check_reschedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<RescheduleCheckRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PolicyService::new(&state);

    let decision = service
        .check_reschedule(request, auth.token())
        .await
        .map_err(map_policy_error)?;

    Ok(Json(json!({
        "success": true,
        "allowed": decision.allowed,
        "violations": decision.violations.iter().map(|v| v.to_payload()).collect::<Vec<_>>()
    })))
}
