// libs/schedule-cell/src/services/calendar.rs
//
// Pure slot generation from the weekly recurring schedule. Time-dependent
// behavior (trimming elapsed slots for today) takes `now` as an explicit
// parameter; long-lived callers re-derive on a coarse tick when the requested
// date is today.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use std::collections::BTreeSet;

use crate::models::WeeklyScheduleEntry;

/// Midday window excluded from slot generation, compared by hour.
#[derive(Debug, Clone, Copy)]
pub struct LunchWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for LunchWindow {
    fn default() -> Self {
        Self { start_hour: 13, end_hour: 15 }
    }
}

impl LunchWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        time.hour() >= self.start_hour && time.hour() < self.end_hour
    }
}

/// Expand the weekly schedule into the ordered set of candidate start times
/// for one date.
///
/// Entries for other weekdays and inactive or malformed entries are ignored.
/// Overlapping split shifts collapse through set semantics. When `date` is
/// today, starts earlier than `now + min_lead_hours` are dropped; slot
/// boundaries quantize the cutoff so a partially elapsed hour excludes its
/// slot.
pub fn base_slots(
    date: NaiveDate,
    entries: &[WeeklyScheduleEntry],
    slot_minutes: u16,
    lunch: LunchWindow,
    now: DateTime<Utc>,
    min_lead_hours: i64,
) -> BTreeSet<NaiveTime> {
    let mut slots = BTreeSet::new();
    if slot_minutes == 0 {
        return slots;
    }

    let weekday = date.weekday().num_days_from_monday() as u8;

    for entry in entries {
        if !entry.active || entry.weekday != weekday || !entry.is_well_formed() {
            continue;
        }

        let mut t = entry.start_minute;
        while t + slot_minutes <= entry.end_minute {
            if let Some(time) = NaiveTime::from_hms_opt(u32::from(t) / 60, u32::from(t) % 60, 0) {
                if !lunch.contains(time) {
                    slots.insert(time);
                }
            }
            t += slot_minutes;
        }
    }

    if date == now.date_naive() {
        let cutoff = now + Duration::hours(min_lead_hours);
        slots.retain(|time| date.and_time(*time).and_utc() >= cutoff);
    }

    slots
}
