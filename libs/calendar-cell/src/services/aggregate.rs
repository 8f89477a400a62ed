// libs/calendar-cell/src/services/aggregate.rs
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use schedule_cell::models::{BookingState, ExistingBooking};
use schedule_cell::services::blackout::BlackoutIndex;

use crate::models::DayBadge;

/// First and last day of a calendar month, or None for an out-of-range month
/// number.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first
        .checked_add_months(chrono::Months::new(1))?
        .pred_opt()?;
    Some((first, last))
}

/// Build the day -> badge map for one month.
///
/// A day's count is the number of bookings on it in a counted state
/// (cancelled is excluded); the result is independent of input ordering.
/// Blocked flags come from the blackout index unioned in.
pub fn aggregate_month(
    first: NaiveDate,
    last: NaiveDate,
    bookings: &[ExistingBooking],
    blackout: &BlackoutIndex,
) -> BTreeMap<NaiveDate, DayBadge> {
    let mut badges = BTreeMap::new();

    let mut day = first;
    while day <= last {
        badges.insert(
            day,
            DayBadge {
                date: day,
                booked_count: 0,
                blocked: blackout.is_blocked(day).is_some(),
            },
        );
        day += Duration::days(1);
    }

    for booking in bookings {
        if !counts_for_badge(booking.state) {
            continue;
        }
        if let Some(badge) = badges.get_mut(&booking.date) {
            badge.booked_count += 1;
        }
    }

    badges
}

fn counts_for_badge(state: BookingState) -> bool {
    matches!(
        state,
        BookingState::Pending | BookingState::Confirmed | BookingState::Realized
    )
}

/// The previous and next (year, month) pair around a month, for the 3-month
/// sliding prefetch window.
pub fn neighbor_months(year: i32, month: u32) -> ((i32, u32), (i32, u32)) {
    let prev = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    let next = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    (prev, next)
}
