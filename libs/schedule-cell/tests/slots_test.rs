// libs/schedule-cell/tests/slots_test.rs
use chrono::NaiveTime;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use schedule_cell::models::Room;
use schedule_cell::services::slots::resolve_slots;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn room(id: u128, label: &str, active: bool) -> Room {
    Room {
        id: Uuid::from_u128(id),
        label: label.to_string(),
        active,
    }
}

fn base(times: &[NaiveTime]) -> BTreeSet<NaiveTime> {
    times.iter().copied().collect()
}

#[test]
fn default_room_is_preferred() {
    let rooms = vec![room(1, "Surgery 1", true), room(2, "Surgery 2", true)];
    let default_id = Uuid::from_u128(2);

    let slots = resolve_slots(&base(&[t(9, 0)]), &rooms, Some(default_id), &HashMap::new());

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].room_id, default_id);
    assert!(slots[0].is_default_room);
}

#[test]
fn falls_back_to_first_free_alternate_by_id() {
    let rooms = vec![
        room(3, "Surgery 3", true),
        room(1, "Surgery 1", true),
        room(2, "Surgery 2", true),
    ];
    let default_id = Uuid::from_u128(2);

    let mut booked = HashMap::new();
    booked.insert(default_id, base(&[t(9, 0)]));

    let slots = resolve_slots(&base(&[t(9, 0)]), &rooms, Some(default_id), &booked);

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].room_id, Uuid::from_u128(1));
    assert!(!slots[0].is_default_room);
}

#[test]
fn fully_booked_time_is_dropped_entirely() {
    let rooms = vec![room(1, "Surgery 1", true), room(2, "Surgery 2", true)];

    let mut booked = HashMap::new();
    booked.insert(Uuid::from_u128(1), base(&[t(9, 0)]));
    booked.insert(Uuid::from_u128(2), base(&[t(9, 0)]));

    let slots = resolve_slots(&base(&[t(9, 0), t(9, 30)]), &rooms, None, &booked);

    // 09:00 has no free room anywhere; only 09:30 is offered.
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].time, t(9, 30));
}

#[test]
fn inactive_rooms_do_not_participate() {
    let rooms = vec![room(1, "Closed wing", false)];

    let slots = resolve_slots(&base(&[t(9, 0)]), &rooms, None, &HashMap::new());

    assert!(slots.is_empty());
}

#[test]
fn output_preserves_ascending_time_order() {
    let rooms = vec![room(1, "Surgery 1", true)];

    let slots = resolve_slots(
        &base(&[t(11, 0), t(9, 0), t(10, 0)]),
        &rooms,
        None,
        &HashMap::new(),
    );

    let times: Vec<NaiveTime> = slots.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![t(9, 0), t(10, 0), t(11, 0)]);
}

#[test]
fn each_time_binds_exactly_one_room() {
    let rooms = vec![room(1, "Surgery 1", true), room(2, "Surgery 2", true)];

    let slots = resolve_slots(&base(&[t(9, 0), t(9, 30)]), &rooms, None, &HashMap::new());

    assert_eq!(slots.len(), 2);
    let mut seen = BTreeSet::new();
    for slot in &slots {
        assert!(seen.insert(slot.time), "time {} emitted twice", slot.time);
    }
}

#[test]
fn empty_base_is_a_normal_empty_result() {
    let rooms = vec![room(1, "Surgery 1", true)];

    let slots = resolve_slots(&BTreeSet::new(), &rooms, None, &HashMap::new());

    assert!(slots.is_empty());
}
