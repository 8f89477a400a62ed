// libs/schedule-cell/tests/calendar_test.rs
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use schedule_cell::models::WeeklyScheduleEntry;
use schedule_cell::services::calendar::{base_slots, LunchWindow};

fn entry(weekday: u8, start_minute: u16, end_minute: u16) -> WeeklyScheduleEntry {
    WeeklyScheduleEntry {
        practitioner_id: Uuid::new_v4(),
        weekday,
        start_minute,
        end_minute,
        active: true,
    }
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2025-06-18 is a Wednesday (weekday 2 with Monday = 0).
fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
}

fn far_in_the_past() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn generates_slots_for_matching_weekday_only() {
    let entries = vec![entry(2, 9 * 60, 12 * 60), entry(3, 9 * 60, 12 * 60)];

    let slots = base_slots(wednesday(), &entries, 30, LunchWindow::default(), far_in_the_past(), 2);

    assert_eq!(slots.len(), 6);
    assert!(slots.contains(&t(9, 0)));
    assert!(slots.contains(&t(11, 30)));
    assert!(!slots.contains(&t(12, 0)));
}

#[test]
fn never_emits_slots_inside_lunch_window() {
    let entries = vec![entry(2, 9 * 60, 18 * 60)];

    let slots = base_slots(wednesday(), &entries, 30, LunchWindow::default(), far_in_the_past(), 2);

    for slot in &slots {
        assert!(
            !LunchWindow::default().contains(*slot),
            "slot {} falls inside the lunch window",
            slot
        );
    }
    assert!(slots.contains(&t(12, 30)));
    assert!(!slots.contains(&t(13, 0)));
    assert!(!slots.contains(&t(14, 30)));
    assert!(slots.contains(&t(15, 0)));
}

#[test]
fn split_shifts_collapse_duplicate_starts() {
    // Overlapping entries both emit 10:00; set semantics keep one.
    let entries = vec![entry(2, 9 * 60, 11 * 60), entry(2, 10 * 60, 12 * 60)];

    let slots = base_slots(wednesday(), &entries, 60, LunchWindow::default(), far_in_the_past(), 2);

    let starts: Vec<NaiveTime> = slots.iter().copied().collect();
    assert_eq!(starts, vec![t(9, 0), t(10, 0), t(11, 0)]);
}

#[test]
fn lead_time_trim_is_noop_for_future_dates() {
    let entries = vec![entry(2, 9 * 60, 12 * 60)];
    let now = Utc.with_ymd_and_hms(2025, 6, 17, 23, 0, 0).unwrap();

    let trimmed = base_slots(wednesday(), &entries, 30, LunchWindow::default(), now, 48);
    let untrimmed = base_slots(wednesday(), &entries, 30, LunchWindow::default(), far_in_the_past(), 48);

    assert_eq!(trimmed, untrimmed);
}

#[test]
fn today_drops_slots_inside_the_lead_window() {
    let entries = vec![entry(2, 9 * 60, 12 * 60)];
    // 08:30 on the requested day itself, 2 hours of lead: the 09:00, 09:30
    // and 10:00 starts are too close, 10:30 onward survives.
    let now = Utc.with_ymd_and_hms(2025, 6, 18, 8, 30, 0).unwrap();

    let slots = base_slots(wednesday(), &entries, 30, LunchWindow::default(), now, 2);

    assert!(!slots.contains(&t(9, 0)));
    assert!(!slots.contains(&t(10, 0)));
    assert!(slots.contains(&t(10, 30)));
    assert!(slots.contains(&t(11, 30)));
}

#[test]
fn inactive_and_malformed_entries_are_ignored() {
    let mut inactive = entry(2, 9 * 60, 12 * 60);
    inactive.active = false;
    let inverted = entry(2, 12 * 60, 9 * 60);

    let slots = base_slots(
        wednesday(),
        &[inactive, inverted],
        30,
        LunchWindow::default(),
        far_in_the_past(),
        2,
    );

    assert!(slots.is_empty());
}

#[test]
fn unscheduled_day_yields_empty_set() {
    let entries = vec![entry(0, 9 * 60, 12 * 60)];

    let slots = base_slots(wednesday(), &entries, 30, LunchWindow::default(), far_in_the_past(), 2);

    assert!(slots.is_empty());
}
