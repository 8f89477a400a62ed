// libs/booking-policy-cell/tests/decision_api_test.rs
use chrono::{Duration, NaiveTime, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use assert_matches::assert_matches;
use booking_policy_cell::models::{
    BookingContext, EvaluateBookingRequest, PolicyError, PolicyViolation,
    RescheduleCheckRequest,
};
use booking_policy_cell::services::decision::PolicyService;
use schedule_cell::models::BookingState;
use shared_config::AppConfig;

const PATIENT: &str = "11111111-1111-1111-1111-111111111111";
const PRACTITIONER: &str = "550e8400-e29b-41d4-a716-446655440000";

async fn setup() -> (PolicyService, MockServer) {
    setup_with_horizon(90).await
}

async fn setup_with_horizon(booking_horizon_days: i64) -> (PolicyService, MockServer) {
    let mock_server = MockServer::start().await;
    let config = AppConfig {
        clinic_api_url: mock_server.uri(),
        clinic_api_key: "test-key".to_string(),
        booking_horizon_days,
        request_timeout_secs: 2,
    };
    (PolicyService::new(&config), mock_server)
}

async fn mock_rows(server: &MockServer, resource: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", resource)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

fn evaluate_request(days_ahead: i64) -> EvaluateBookingRequest {
    EvaluateBookingRequest {
        patient_id: PATIENT.parse().unwrap(),
        practitioner_id: PRACTITIONER.parse().unwrap(),
        date: Utc::now().date_naive() + Duration::days(days_ahead),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        context: BookingContext::Patient,
    }
}

#[tokio::test]
async fn clean_history_is_admitted_as_pending() {
    let (service, server) = setup().await;

    mock_rows(&server, "patients", json!([{"id": PATIENT}])).await;
    mock_rows(&server, "practitioners", json!([{"id": PRACTITIONER}])).await;
    mock_rows(&server, "bookings", json!([])).await;
    mock_rows(&server, "patient_cancellations", json!([])).await;
    mock_rows(&server, "clinic_policy", json!([])).await;
    mock_rows(&server, "blackout_rules", json!([])).await;

    let decision = service
        .evaluate(evaluate_request(30), "test-token")
        .await
        .expect("decision should resolve");

    assert!(decision.admitted, "violations: {:?}", decision.violations);
    assert_eq!(decision.initial_state, BookingState::Pending);
}

#[tokio::test]
async fn existing_appointment_with_practitioner_is_refused() {
    let (service, server) = setup().await;

    mock_rows(&server, "patients", json!([{"id": PATIENT}])).await;
    mock_rows(&server, "practitioners", json!([{"id": PRACTITIONER}])).await;
    mock_rows(
        &server,
        "bookings",
        json!([{
            "patient_id": PATIENT,
            "practitioner_id": PRACTITIONER,
            "date": (Utc::now().date_naive() + Duration::days(10)).to_string(),
            "time": "09:00:00",
            "room_id": "00000000-0000-0000-0000-00000000000a",
            "state": "confirmed"
        }]),
    )
    .await;
    mock_rows(&server, "patient_cancellations", json!([])).await;
    mock_rows(&server, "clinic_policy", json!([])).await;
    mock_rows(&server, "blackout_rules", json!([])).await;

    let decision = service
        .evaluate(evaluate_request(30), "test-token")
        .await
        .expect("decision should resolve");

    assert!(!decision.admitted);
}

#[tokio::test]
async fn configured_horizon_backstops_a_missing_policy_row() {
    let (service, server) = setup_with_horizon(5).await;

    mock_rows(&server, "patients", json!([{"id": PATIENT}])).await;
    mock_rows(&server, "practitioners", json!([{"id": PRACTITIONER}])).await;
    mock_rows(&server, "bookings", json!([])).await;
    mock_rows(&server, "patient_cancellations", json!([])).await;
    mock_rows(&server, "clinic_policy", json!([])).await;
    mock_rows(&server, "blackout_rules", json!([])).await;

    let decision = service
        .evaluate(evaluate_request(10), "test-token")
        .await
        .expect("decision should resolve");

    assert!(!decision.admitted);
    assert!(decision
        .violations
        .iter()
        .any(|v| matches!(v, PolicyViolation::HorizonExceeded { max_days: 5 })));
}

#[tokio::test]
async fn unknown_patient_is_an_input_error_not_a_violation() {
    let (service, server) = setup().await;

    mock_rows(&server, "patients", json!([])).await;
    mock_rows(&server, "practitioners", json!([{"id": PRACTITIONER}])).await;

    let result = service.evaluate(evaluate_request(30), "test-token").await;
    assert_matches!(result, Err(PolicyError::PatientNotFound));
}

#[tokio::test]
async fn reschedule_check_reads_the_clinic_policy() {
    let (service, server) = setup().await;

    // A clinic that allows three reschedules.
    mock_rows(
        &server,
        "clinic_policy",
        json!([{"max_reschedules_per_appointment": 3}]),
    )
    .await;

    let request = RescheduleCheckRequest {
        date: Utc::now().date_naive() + Duration::days(10),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        reschedule_count: 2,
    };

    let decision = service
        .check_reschedule(request, "test-token")
        .await
        .expect("check should resolve");

    assert!(decision.allowed, "violations: {:?}", decision.violations);
}
