// libs/schedule-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

// ==============================================================================
// REFERENCE DATA (externally owned, read-only to the engine)
// ==============================================================================
//
// Upstream payloads are loosely shaped (the same concept appears under several
// field names depending on the API screen that produced it), so every field
// that varies carries serde aliases. The rest of the engine only ever sees
// these strict types.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: Uuid,
    #[serde(alias = "name")]
    pub full_name: String,
    #[serde(alias = "is_active", default = "default_true")]
    pub active: bool,
    #[serde(alias = "preferred_room_id", default)]
    pub default_room_id: Option<Uuid>,
    #[serde(alias = "duration_minutes", default = "default_slot_minutes")]
    pub slot_minutes: u16,
}

fn default_true() -> bool {
    true
}

fn default_slot_minutes() -> u16 {
    30
}

/// One recurring shift of a practitioner's weekly schedule. Split shifts are
/// multiple entries sharing a weekday. Weekday is ISO-style with Monday = 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleEntry {
    pub practitioner_id: Uuid,
    #[serde(alias = "day_of_week")]
    pub weekday: u8,
    #[serde(alias = "start_min")]
    pub start_minute: u16,
    #[serde(alias = "end_min")]
    pub end_minute: u16,
    #[serde(alias = "is_active", default = "default_true")]
    pub active: bool,
}

impl WeeklyScheduleEntry {
    /// Boundary check for malformed upstream rows: a usable entry has a
    /// positive span that stays within the day.
    pub fn is_well_formed(&self) -> bool {
        self.weekday <= 6 && self.end_minute > self.start_minute && self.end_minute <= 24 * 60
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlackoutScope {
    Global,
    Practitioner,
}

/// A date range during which no appointments may be booked. When
/// `annual_recurrence` is set only the month-day portion of the range is
/// matched, wrapping over year-end when the start month-day is after the end
/// month-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackoutRule {
    pub scope: BlackoutScope,
    #[serde(alias = "from_date")]
    pub start_date: NaiveDate,
    #[serde(alias = "to_date")]
    pub end_date: NaiveDate,
    #[serde(alias = "is_annual", alias = "annually_recurring", default)]
    pub annual_recurrence: bool,
    #[serde(alias = "description", default)]
    pub reason: Option<String>,
}

impl BlackoutRule {
    pub fn covers(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;

        if self.annual_recurrence {
            let md = (date.month(), date.day());
            let start = (self.start_date.month(), self.start_date.day());
            let end = (self.end_date.month(), self.end_date.day());
            if start <= end {
                start <= md && md <= end
            } else {
                // Range spans year-end, e.g. Dec 24 .. Jan 02
                md >= start || md <= end
            }
        } else {
            self.start_date <= date && date <= self.end_date
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "is_active", default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    Pending,
    Confirmed,
    Realized,
    Cancelled,
}

impl BookingState {
    /// Pending and confirmed bookings hold their slot and count against
    /// patient caps.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingState::Pending | BookingState::Confirmed)
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingState::Pending => write!(f, "pending"),
            BookingState::Confirmed => write!(f, "confirmed"),
            BookingState::Realized => write!(f, "realized"),
            BookingState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Read snapshot of a persisted booking. The engine never mutates these;
/// creation goes through the external appointment write API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub date: NaiveDate,
    #[serde(alias = "start_time")]
    pub time: NaiveTime,
    pub practitioner_id: Uuid,
    pub room_id: Uuid,
    #[serde(alias = "status")]
    pub state: BookingState,
}

// ==============================================================================
// DERIVED AVAILABILITY OUTPUT
// ==============================================================================

/// A bookable (time, room) pair for one practitioner and date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotOption {
    pub time: NaiveTime,
    pub room_id: Uuid,
    pub is_default_room: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedDay {
    pub date: NaiveDate,
    pub scope: BlackoutScope,
    pub reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Practitioner not found")]
    PractitionerNotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream read failed: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub blocked: Option<BlockedDay>,
    pub slots: Vec<SlotOption>,
}
