// libs/calendar-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::models::BookingState;

/// One day's badge on the booking calendar widget. Derived data, recomputed
/// from read snapshots and cached per visible month, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayBadge {
    pub date: NaiveDate,
    pub booked_count: u32,
    pub blocked: bool,
}

/// Cache key for one aggregated month. Filter fields participate in the key
/// so differently filtered views of the same month never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
    pub practitioner_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub state: Option<BookingState>,
}

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Upstream read failed: {0}")]
    Upstream(String),
}
