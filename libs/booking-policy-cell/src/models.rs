// libs/booking-policy-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use schedule_cell::models::BookingState;

// ==============================================================================
// CANDIDATE AND CONTEXT
// ==============================================================================

/// The (patient, practitioner, date, time) tuple a booking decision is asked
/// about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCandidate {
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Which surface is asking. The same rule set serves both booking screens;
/// staff-initiated bookings skip the lead-time and cooldown rules, patients
/// get the full set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingContext {
    #[default]
    Patient,
    Staff,
}

impl BookingContext {
    pub fn enforces_lead_time(&self) -> bool {
        matches!(self, BookingContext::Patient)
    }

    pub fn enforces_cooldown(&self) -> bool {
        matches!(self, BookingContext::Patient)
    }
}

// ==============================================================================
// PATIENT HISTORY (read snapshot)
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAppointment {
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    #[serde(alias = "start_time")]
    pub time: NaiveTime,
    #[serde(alias = "status")]
    pub state: BookingState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Patient,
    Staff,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRecord {
    pub practitioner_id: Uuid,
    pub cancelled_at: DateTime<Utc>,
    #[serde(alias = "no_show", default)]
    pub was_no_show: bool,
    #[serde(alias = "cancelled_by_role")]
    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientBookingHistory {
    pub active: Vec<ActiveAppointment>,
    pub cancellations: Vec<CancellationRecord>,
}

// ==============================================================================
// DECISION OUTPUTS
// ==============================================================================

/// A violated admission rule. These are decision outputs rendered as UI
/// guidance, never errors; the evaluator reports every violated rule at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyViolation {
    #[error("Requested date {date} is in the past")]
    DateInPast { date: NaiveDate },

    #[error("Requested date is more than {max_days} days ahead")]
    HorizonExceeded { max_days: i64 },

    #[error("Day is blocked{}", .reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default())]
    DayBlocked { reason: Option<String> },

    #[error("Bookings require at least {required_hours} hours of lead time")]
    LeadTimeTooShort { required_hours: i64 },

    #[error("Patient already has {cap} appointment(s) in this period")]
    DailyCapReached { cap: u32 },

    #[error("Patient already has {cap} active appointment(s)")]
    ActiveCapReached { cap: u32 },

    #[error("Patient already has an active appointment with this practitioner")]
    PractitionerExclusivity,

    #[error("Cooldown after cancellation is active until {until}")]
    CooldownActive { until: NaiveDate },

    #[error("Appointment was already rescheduled {max} time(s)")]
    RescheduleLimitReached { max: u32 },

    #[error("Changes are only allowed up to {hours} hours before the appointment")]
    ManageWindowClosed { hours: i64 },
}

impl PolicyViolation {
    /// Machine-readable kind plus human-readable message, for UI rendering.
    pub fn to_payload(&self) -> Value {
        let mut payload = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(object) = payload.as_object_mut() {
            object.insert("message".to_string(), json!(self.to_string()));
        }
        payload
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDecision {
    pub admitted: bool,
    pub violations: Vec<PolicyViolation>,
    /// State the booking would be created in: within the auto-confirm window
    /// it skips manual confirmation and starts out confirmed.
    pub initial_state: BookingState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleDecision {
    pub allowed: bool,
    pub violations: Vec<PolicyViolation>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateBookingRequest {
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub context: BookingContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleCheckRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reschedule_count: u32,
}

// ==============================================================================
// ERRORS (input and upstream failures, distinct from violations)
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Practitioner not found")]
    PractitionerNotFound,

    #[error("Upstream read failed: {0}")]
    Upstream(String),
}
