//! Venue layout: rooms and time slots
//!
//! The layout is read-only configuration. Every schedule row is an array of
//! [`ROOM_COUNT`] session ids where index `i` is the room at position `i`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{Result, ScheduleError};

/// Number of rooms in every slot
pub const ROOM_COUNT: usize = 8;

/// Number of time slots in a schedule
pub const SLOT_COUNT: usize = 7;

/// A physical room with its simulcast overflow theaters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index into each slot's session array (0-based)
    pub position: usize,
    /// Seat count of the live room
    pub capacity: u32,
    /// Display alias (e.g., "Room 1")
    pub alias: String,
    /// Theater hosting the live talk
    pub live: String,
    /// Theaters receiving the simulcast
    pub simulcast: String,
}

impl Room {
    fn new(position: usize, capacity: u32, live: &str, simulcast: &str) -> Self {
        Self {
            position,
            capacity,
            alias: format!("Room {}", position + 1),
            live: live.to_string(),
            simulcast: simulcast.to_string(),
        }
    }

    /// Column header used by reports, e.g. "Room 1 (388)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.alias, self.capacity)
    }
}

/// A named time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot key used in schedules (`slot_1` .. `slot_7`)
    pub name: String,
    /// Wall-clock label
    pub label: String,
}

impl Slot {
    fn new(number: usize, label: &str) -> Self {
        Self {
            name: format!("slot_{}", number),
            label: label.to_string(),
        }
    }
}

/// The fixed grid of rooms and slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueLayout {
    pub rooms: Vec<Room>,
    pub slots: Vec<Slot>,
}

impl Default for VenueLayout {
    fn default() -> Self {
        let rooms = vec![
            Room::new(0, 388, "Theater 14", "Theaters 12, 13"),
            Room::new(1, 314, "Theater 15", "Theaters 10, 11"),
            Room::new(2, 228, "Theater 16", "Theater 21"),
            Room::new(3, 234, "Theater 17", "Theater 20"),
            Room::new(4, 340, "Theater 4", "Theaters 5,6,7,8,9"),
            Room::new(5, 293, "Theater 3", "Theaters 1, 2"),
            Room::new(6, 224, "Theater 27", "Theaters 23,24,25,26"),
            Room::new(7, 173, "Theater 28", "Theaters 18, 19"),
        ];

        let slots = [
            "08:30am - 09:15am",
            "09:30am - 10:15am",
            "10:30am - 11:15am",
            "11:30am - 12:15pm",
            "02:00pm - 02:45pm",
            "03:00pm - 03:45pm",
            "04:00pm - 04:45pm",
        ]
        .iter()
        .enumerate()
        .map(|(i, label)| Slot::new(i + 1, label))
        .collect();

        Self { rooms, slots }
    }
}

impl VenueLayout {
    /// Check that the table describes the fixed grid
    pub fn check(&self) -> Result<()> {
        if self.rooms.len() != ROOM_COUNT {
            return Err(ScheduleError::InvalidLayout(format!(
                "expected {} rooms, got {}",
                ROOM_COUNT,
                self.rooms.len()
            )));
        }
        for (i, room) in self.rooms.iter().enumerate() {
            if room.position != i {
                return Err(ScheduleError::InvalidLayout(format!(
                    "room '{}' has position {}, expected {}",
                    room.alias, room.position, i
                )));
            }
        }

        if self.slots.len() != SLOT_COUNT {
            return Err(ScheduleError::InvalidLayout(format!(
                "expected {} slots, got {}",
                SLOT_COUNT,
                self.slots.len()
            )));
        }
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if !seen.insert(slot.name.as_str()) {
                return Err(ScheduleError::InvalidLayout(format!(
                    "duplicate slot name '{}'",
                    slot.name
                )));
            }
        }

        Ok(())
    }

    /// Room at a schedule array index
    pub fn room(&self, position: usize) -> Option<&Room> {
        self.rooms.get(position)
    }

    /// Slot by key
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Numeric suffix of a slot key (`slot_12` -> 12)
fn slot_number(name: &str) -> Option<u64> {
    name.rsplit_once('_')
        .and_then(|(_, suffix)| suffix.parse().ok())
}

/// Processing order for slot keys.
///
/// Keys are ordered by their numeric suffix so `slot_10` follows `slot_9`.
/// Keys without one sort after all numbered keys, by name.
pub fn slot_order(a: &str, b: &str) -> Ordering {
    match (slot_number(a), slot_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
