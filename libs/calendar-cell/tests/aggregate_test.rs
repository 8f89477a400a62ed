// libs/calendar-cell/tests/aggregate_test.rs
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use calendar_cell::services::aggregate::{aggregate_month, month_bounds, neighbor_months};
use schedule_cell::models::{
    BlackoutRule, BlackoutScope, BookingState, ExistingBooking,
};
use schedule_cell::services::blackout::BlackoutIndex;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn booking(date: NaiveDate, hour: u32, state: BookingState) -> ExistingBooking {
    ExistingBooking {
        date,
        time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        practitioner_id: Uuid::from_u128(1),
        room_id: Uuid::from_u128(10),
        state,
    }
}

#[test]
fn month_bounds_handle_leap_years_and_december() {
    assert_eq!(month_bounds(2024, 2), Some((d(2024, 2, 1), d(2024, 2, 29))));
    assert_eq!(month_bounds(2025, 2), Some((d(2025, 2, 1), d(2025, 2, 28))));
    assert_eq!(month_bounds(2025, 12), Some((d(2025, 12, 1), d(2025, 12, 31))));
    assert_eq!(month_bounds(2025, 13), None);
    assert_eq!(month_bounds(2025, 0), None);
}

#[test]
fn counts_exclude_cancelled_bookings() {
    let (first, last) = month_bounds(2025, 6).unwrap();
    let bookings = vec![
        booking(d(2025, 6, 10), 9, BookingState::Pending),
        booking(d(2025, 6, 10), 10, BookingState::Confirmed),
        booking(d(2025, 6, 10), 11, BookingState::Realized),
        booking(d(2025, 6, 10), 12, BookingState::Cancelled),
    ];

    let badges = aggregate_month(first, last, &bookings, &BlackoutIndex::default());

    assert_eq!(badges.len(), 30);
    assert_eq!(badges[&d(2025, 6, 10)].booked_count, 3);
    assert_eq!(badges[&d(2025, 6, 11)].booked_count, 0);
}

#[test]
fn aggregation_is_order_independent() {
    let (first, last) = month_bounds(2025, 6).unwrap();
    let mut bookings = vec![
        booking(d(2025, 6, 20), 9, BookingState::Confirmed),
        booking(d(2025, 6, 5), 10, BookingState::Pending),
        booking(d(2025, 6, 20), 11, BookingState::Realized),
    ];

    let forward = aggregate_month(first, last, &bookings, &BlackoutIndex::default());
    bookings.reverse();
    let backward = aggregate_month(first, last, &bookings, &BlackoutIndex::default());

    assert_eq!(forward, backward);
}

#[test]
fn blocked_flags_come_from_the_blackout_index() {
    let (first, last) = month_bounds(2025, 12).unwrap();
    let rules = vec![BlackoutRule {
        scope: BlackoutScope::Global,
        start_date: d(2025, 12, 24),
        end_date: d(2025, 12, 26),
        annual_recurrence: false,
        reason: Some("holidays".to_string()),
    }];
    let index = BlackoutIndex::build(first, last, &rules);

    let bookings = vec![booking(d(2025, 12, 24), 9, BookingState::Confirmed)];
    let badges = aggregate_month(first, last, &bookings, &index);

    // A blocked day still reports whatever bookings it carries.
    assert!(badges[&d(2025, 12, 24)].blocked);
    assert_eq!(badges[&d(2025, 12, 24)].booked_count, 1);
    assert!(badges[&d(2025, 12, 25)].blocked);
    assert!(!badges[&d(2025, 12, 23)].blocked);
}

#[test]
fn bookings_outside_the_month_are_ignored() {
    let (first, last) = month_bounds(2025, 6).unwrap();
    let bookings = vec![
        booking(d(2025, 5, 31), 9, BookingState::Confirmed),
        booking(d(2025, 7, 1), 9, BookingState::Confirmed),
    ];

    let badges = aggregate_month(first, last, &bookings, &BlackoutIndex::default());
    assert!(badges.values().all(|badge| badge.booked_count == 0));
}

#[test]
fn neighbor_months_wrap_over_year_boundaries() {
    assert_eq!(neighbor_months(2025, 6), ((2025, 5), (2025, 7)));
    assert_eq!(neighbor_months(2025, 1), ((2024, 12), (2025, 2)));
    assert_eq!(neighbor_months(2025, 12), ((2025, 11), (2026, 1)));
}
