// libs/booking-policy-cell/src/services/policy.rs
//
// Pure admission-rule evaluation over read snapshots. Every rule is checked
// independently and none short-circuits, so callers can present all violated
// rules at once. Time comes in as an explicit `now` parameter.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use shared_models::policy::{CapWindow, PolicyConfig};

use schedule_cell::models::BookingState;
use schedule_cell::services::blackout::DayBlock;

use crate::models::{
    BookingCandidate, BookingContext, BookingDecision, PatientBookingHistory,
    PolicyViolation, RescheduleDecision,
};

/// Evaluate a candidate booking against the full admission rule set.
pub fn evaluate_booking(
    candidate: &BookingCandidate,
    history: &PatientBookingHistory,
    day_block: Option<&DayBlock>,
    config: &PolicyConfig,
    now: DateTime<Utc>,
    context: BookingContext,
) -> BookingDecision {
    let mut violations = Vec::new();
    let today = now.date_naive();
    let starts_at = candidate.date.and_time(candidate.time).and_utc();

    // 1. Date range: not in the past, not beyond the booking horizon.
    if candidate.date < today {
        violations.push(PolicyViolation::DateInPast { date: candidate.date });
    } else if candidate.date > today + Duration::days(config.max_advance_days) {
        violations.push(PolicyViolation::HorizonExceeded {
            max_days: config.max_advance_days,
        });
    }

    // 2. Blackout.
    if let Some(block) = day_block {
        violations.push(PolicyViolation::DayBlocked {
            reason: block.reason.clone(),
        });
    }

    // 3. Lead time (patients only).
    if context.enforces_lead_time() && starts_at < now + Duration::hours(config.min_lead_hours) {
        violations.push(PolicyViolation::LeadTimeTooShort {
            required_hours: config.min_lead_hours,
        });
    }

    // 4. Cap within the configured window (calendar day or ISO week).
    let in_window = history
        .active
        .iter()
        .filter(|appointment| same_cap_window(appointment.date, candidate.date, config.cap_window))
        .count() as u32;
    if in_window >= config.max_appointments_per_patient_per_day {
        violations.push(PolicyViolation::DailyCapReached {
            cap: config.max_appointments_per_patient_per_day,
        });
    }

    // 5. Global active cap, across all practitioners.
    if history.active.len() as u32 >= config.max_active_appointments_per_patient {
        violations.push(PolicyViolation::ActiveCapReached {
            cap: config.max_active_appointments_per_patient,
        });
    }

    // 6. Practitioner exclusivity.
    if history
        .active
        .iter()
        .any(|appointment| appointment.practitioner_id == candidate.practitioner_id)
    {
        violations.push(PolicyViolation::PractitionerExclusivity);
    }

    // 7. Cooldown after the most recent cancellation with this practitioner
    //    (patients only). No-show and patient-initiated cancellations use the
    //    same configured duration as clinic-initiated ones.
    if context.enforces_cooldown() {
        if let Some(last) = history
            .cancellations
            .iter()
            .filter(|c| c.practitioner_id == candidate.practitioner_id)
            .max_by_key(|c| c.cancelled_at)
        {
            let unlock = last.cancelled_at.date_naive() + Duration::days(config.cooldown_days);
            if candidate.date < unlock {
                violations.push(PolicyViolation::CooldownActive { until: unlock });
            }
        }
    }

    let admitted = violations.is_empty();
    BookingDecision {
        admitted,
        violations,
        initial_state: initial_state(starts_at, now, config),
    }
}

/// 8. Auto-confirmation: a booking close enough to its start time skips
/// manual confirmation.
fn initial_state(starts_at: DateTime<Utc>, now: DateTime<Utc>, config: &PolicyConfig) -> BookingState {
    if starts_at - now < Duration::hours(config.auto_confirm_within_hours) {
        BookingState::Confirmed
    } else {
        BookingState::Pending
    }
}

fn same_cap_window(a: NaiveDate, b: NaiveDate, window: CapWindow) -> bool {
    match window {
        CapWindow::Day => a == b,
        CapWindow::Week => a.iso_week() == b.iso_week(),
    }
}

/// Sibling rule to booking admission: a reschedule is refused once the
/// reschedule count is exhausted or the manage-until window has closed.
pub fn evaluate_reschedule(
    date: NaiveDate,
    time: NaiveTime,
    reschedule_count: u32,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> RescheduleDecision {
    let mut violations = Vec::new();

    if reschedule_count >= config.max_reschedules_per_appointment {
        violations.push(PolicyViolation::RescheduleLimitReached {
            max: config.max_reschedules_per_appointment,
        });
    }

    if !manage_window_open(date, time, config, now) {
        violations.push(PolicyViolation::ManageWindowClosed {
            hours: config.manage_until_hours,
        });
    }

    RescheduleDecision {
        allowed: violations.is_empty(),
        violations,
    }
}

/// Cancellation shares the manage-until window but has no count limit.
pub fn evaluate_cancellation(
    date: NaiveDate,
    time: NaiveTime,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> RescheduleDecision {
    let mut violations = Vec::new();

    if !manage_window_open(date, time, config, now) {
        violations.push(PolicyViolation::ManageWindowClosed {
            hours: config.manage_until_hours,
        });
    }

    RescheduleDecision {
        allowed: violations.is_empty(),
        violations,
    }
}

fn manage_window_open(date: NaiveDate, time: NaiveTime, config: &PolicyConfig, now: DateTime<Utc>) -> bool {
    let starts_at = date.and_time(time).and_utc();
    starts_at - now >= Duration::hours(config.manage_until_hours)
}
