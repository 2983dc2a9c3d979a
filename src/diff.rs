//! Changed-cell sets between schedule versions

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::schedule::Schedule;
use crate::version::ScheduleVersion;

/// A grid coordinate: slot key and room position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub slot: String,
    pub position: usize,
}

impl Cell {
    pub fn new(slot: impl Into<String>, position: usize) -> Self {
        Self {
            slot: slot.into(),
            position,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.slot, self.position)
    }
}

pub type DiffSet = BTreeSet<Cell>;

/// Cells where `current` disagrees with `previous`.
///
/// Only slots present in `current` are walked. A position missing on one
/// side counts as a change.
pub fn diff_schedules(current: &Schedule, previous: &Schedule) -> DiffSet {
    let mut cells = DiffSet::new();
    for (slot, cur) in current.iter() {
        let prev = previous.get(slot).unwrap_or_default();
        for position in 0..cur.len().max(prev.len()) {
            if cur.get(position) != prev.get(position) {
                cells.insert(Cell::new(slot, position));
            }
        }
    }
    cells
}

/// Cells changed since the preceding version; empty for the first version
pub fn diff(current: &ScheduleVersion, previous: Option<&ScheduleVersion>) -> DiffSet {
    match previous {
        Some(prev) => diff_schedules(&current.schedule, &prev.schedule),
        None => DiffSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_change() {
        let a = Schedule::new()
            .with_slot("slot_1", ["1", "2", "3"])
            .with_slot("slot_2", ["4", "5", "6"]);
        let b = a.clone().with_slot("slot_2", ["4", "9", "6"]);

        let cells = diff_schedules(&b, &a);
        assert_eq!(cells.len(), 1);
        assert!(cells.contains(&Cell::new("slot_2", 1)));
    }

    #[test]
    fn test_missing_slot_marks_every_position() {
        let a = Schedule::new().with_slot("slot_1", ["1", "2"]);
        let b = a.clone().with_slot("slot_2", ["3", "4"]);

        let cells: Vec<String> = diff_schedules(&b, &a).iter().map(ToString::to_string).collect();
        assert_eq!(cells, vec!["slot_2:0", "slot_2:1"]);
    }

    #[test]
    fn test_shorter_row_counts_as_change() {
        let a = Schedule::new().with_slot("slot_1", ["1", "2", "3"]);
        let b = Schedule::new().with_slot("slot_1", ["1", "2"]);
        let cells = diff_schedules(&b, &a);
        assert_eq!(cells.into_iter().collect::<Vec<_>>(), vec![Cell::new("slot_1", 2)]);
    }

    #[test]
    fn test_slots_only_in_previous_ignored() {
        let a = Schedule::new()
            .with_slot("slot_1", ["1"])
            .with_slot("slot_2", ["2"]);
        let b = Schedule::new().with_slot("slot_1", ["1"]);
        assert!(diff_schedules(&b, &a).is_empty());
    }

    #[test]
    fn test_first_version_has_empty_diff() {
        let v1 = ScheduleVersion::new(1, Schedule::new().with_slot("slot_1", ["1"]), None, None);
        assert!(diff(&v1, None).is_empty());
    }
}
