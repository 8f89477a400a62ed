// libs/schedule-cell/src/services/slots.rs
use chrono::NaiveTime;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use crate::models::{Room, SlotOption};

/// Bind each base start time to a room.
///
/// Rooms are tried default-first, remaining active rooms in ascending id
/// order; the first room without a booking at that time wins. Times with no
/// free room are dropped entirely, so the output never contains a room-less
/// slot. Output preserves ascending time order.
pub fn resolve_slots(
    base: &BTreeSet<NaiveTime>,
    rooms: &[Room],
    default_room_id: Option<Uuid>,
    booked_by_room: &HashMap<Uuid, BTreeSet<NaiveTime>>,
) -> Vec<SlotOption> {
    let mut ordered: Vec<&Room> = rooms.iter().filter(|r| r.active).collect();
    ordered.sort_by_key(|r| r.id);
    if let Some(default_id) = default_room_id {
        if let Some(pos) = ordered.iter().position(|r| r.id == default_id) {
            let preferred = ordered.remove(pos);
            ordered.insert(0, preferred);
        }
    }

    let mut resolved = Vec::new();
    for &time in base {
        for room in &ordered {
            let taken = booked_by_room
                .get(&room.id)
                .is_some_and(|times| times.contains(&time));
            if !taken {
                resolved.push(SlotOption {
                    time,
                    room_id: room.id,
                    is_default_room: default_room_id == Some(room.id),
                });
                break;
            }
        }
    }

    resolved
}
