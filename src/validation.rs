//! Hard-constraint validation for candidate schedules.
//!
//! Every check runs on every call; nothing short-circuits, so a producer
//! sees all violations at once. Violations are appended in a fixed order:
//!
//! 1. Slot count
//! 2. Per slot, in slot order: row length, then each position in room
//!    order (unknown id or repeated speaker)
//! 3. Missing catalog sessions
//! 4. Ids assigned more than once

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::catalog::Catalog;
use crate::schedule::Schedule;
use crate::venue::{VenueLayout, ROOM_COUNT, SLOT_COUNT};

/// Categories of violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The producer did not follow the slot/room shape
    Structural,
    /// Ids do not form a bijection with the catalog
    Referential,
    /// A scheduling rule is broken
    Constraint,
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    SlotCount {
        expected: usize,
        actual: usize,
    },
    SlotSize {
        slot: String,
        expected: usize,
        actual: usize,
    },
    SpeakerConflict {
        slot: String,
        speaker: String,
    },
    UnknownSession {
        slot: String,
        session_id: String,
    },
    MissingSessions {
        session_ids: Vec<String>,
    },
    DuplicateSessions {
        session_ids: Vec<String>,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::SlotCount { .. } | Violation::SlotSize { .. } => ViolationKind::Structural,
            Violation::UnknownSession { .. }
            | Violation::MissingSessions { .. }
            | Violation::DuplicateSessions { .. } => ViolationKind::Referential,
            Violation::SpeakerConflict { .. } => ViolationKind::Constraint,
        }
    }

    /// Slot the violation is scoped to, if any
    pub fn slot(&self) -> Option<&str> {
        match self {
            Violation::SlotSize { slot, .. }
            | Violation::SpeakerConflict { slot, .. }
            | Violation::UnknownSession { slot, .. } => Some(slot.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SlotCount { expected, actual } => {
                write!(f, "Expected {} slots, got {}", expected, actual)
            }
            Violation::SlotSize { slot, expected, actual } => {
                write!(f, "{}: expected {} sessions, got {}", slot, expected, actual)
            }
            Violation::SpeakerConflict { slot, speaker } => {
                write!(f, "{}: speaker '{}' appears twice", slot, speaker)
            }
            Violation::UnknownSession { slot, session_id } => {
                write!(f, "{}: unknown session ID '{}'", slot, session_id)
            }
            Violation::MissingSessions { session_ids } => {
                write!(f, "Missing sessions: {}", session_ids.join(", "))
            }
            Violation::DuplicateSessions { session_ids } => {
                write!(f, "Duplicate session IDs: {}", session_ids.join(", "))
            }
        }
    }
}

/// Outcome of validating one schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True iff no violation was found
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind() == kind).count()
    }

    /// Human-readable messages, in report order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Checks schedules against the grid shape and catalog
#[derive(Debug, Clone)]
pub struct Validator {
    slot_count: usize,
    room_count: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            slot_count: SLOT_COUNT,
            room_count: ROOM_COUNT,
        }
    }
}

impl Validator {
    pub fn new(layout: &VenueLayout) -> Self {
        Self {
            slot_count: layout.slot_count(),
            room_count: layout.room_count(),
        }
    }

    pub fn validate(&self, schedule: &Schedule, catalog: &Catalog) -> ValidationReport {
        let mut violations = Vec::new();

        if schedule.slot_count() != self.slot_count {
            violations.push(Violation::SlotCount {
                expected: self.slot_count,
                actual: schedule.slot_count(),
            });
        }

        // Insertion order of first appearance, for deterministic reporting
        let mut occurrences: Vec<(&str, usize)> = Vec::new();
        let mut occurrence_index: HashMap<&str, usize> = HashMap::new();
        let mut assigned: HashSet<&str> = HashSet::new();

        for (slot, ids) in schedule.iter() {
            if ids.len() != self.room_count {
                violations.push(Violation::SlotSize {
                    slot: slot.to_string(),
                    expected: self.room_count,
                    actual: ids.len(),
                });
            }

            let mut speakers_in_slot: HashSet<&str> = HashSet::new();
            for id in ids {
                let id = id.as_str();
                match occurrence_index.get(id) {
                    Some(&i) => occurrences[i].1 += 1,
                    None => {
                        occurrence_index.insert(id, occurrences.len());
                        occurrences.push((id, 1));
                    }
                }

                match catalog.get(id) {
                    Some(session) => {
                        assigned.insert(id);
                        if !speakers_in_slot.insert(session.speaker.as_str()) {
                            violations.push(Violation::SpeakerConflict {
                                slot: slot.to_string(),
                                speaker: session.speaker.clone(),
                            });
                        }
                    }
                    None => violations.push(Violation::UnknownSession {
                        slot: slot.to_string(),
                        session_id: id.to_string(),
                    }),
                }
            }
        }

        let mut missing: Vec<String> = catalog
            .ids()
            .filter(|id| !assigned.contains(id))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            violations.push(Violation::MissingSessions { session_ids: missing });
        }

        let duplicates: Vec<String> = occurrences
            .iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id.to_string())
            .collect();
        if !duplicates.is_empty() {
            violations.push(Violation::DuplicateSessions { session_ids: duplicates });
        }

        let report = ValidationReport { violations };
        debug!(
            slots = schedule.slot_count(),
            violations = report.violations.len(),
            "validated schedule"
        );
        report
    }
}

/// Validate against the default grid shape
pub fn validate(schedule: &Schedule, catalog: &Catalog) -> ValidationReport {
    Validator::default().validate(schedule, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Session;

    /// 56 sessions with distinct speakers, rows of 8 in id order
    fn fixture() -> (Catalog, Schedule) {
        let sessions = (1..=56)
            .map(|i| Session::new(i.to_string(), format!("Talk {}", i), format!("Speaker {}", i), "General"))
            .collect();
        let catalog = Catalog::new(sessions).unwrap();
        let mut schedule = Schedule::new();
        for slot in 0..7 {
            let ids: Vec<String> = (1..=8).map(|p| (slot * 8 + p).to_string()).collect();
            schedule = schedule.with_slot(format!("slot_{}", slot + 1), ids);
        }
        (catalog, schedule)
    }

    fn replace_row(schedule: &Schedule, slot: &str, ids: Vec<String>) -> Schedule {
        schedule.clone().with_slot(slot, ids)
    }

    #[test]
    fn test_valid_schedule_passes() {
        let (catalog, schedule) = fixture();
        let report = validate(&schedule, &catalog);
        assert!(report.is_ok(), "{:?}", report.messages());
    }

    #[test]
    fn test_missing_slot_reported() {
        let (catalog, _) = fixture();
        let schedule = Schedule::new().with_slot("slot_1", (1..=8).map(|i| i.to_string()));
        let report = validate(&schedule, &catalog);
        assert_eq!(
            report.violations[0],
            Violation::SlotCount { expected: 7, actual: 1 }
        );
        assert_eq!(report.messages()[0], "Expected 7 slots, got 1");
        assert!(matches!(report.violations.last(), Some(Violation::MissingSessions { session_ids }) if session_ids.len() == 48));
    }

    #[test]
    fn test_unknown_id_reported_per_slot() {
        let (catalog, schedule) = fixture();
        let mut row: Vec<String> = schedule.get("slot_3").unwrap().to_vec();
        row[4] = "999".to_string();
        let schedule = replace_row(&schedule, "slot_3", row);

        let report = validate(&schedule, &catalog);
        assert_eq!(
            report.violations,
            vec![
                Violation::UnknownSession {
                    slot: "slot_3".to_string(),
                    session_id: "999".to_string()
                },
                Violation::MissingSessions {
                    session_ids: vec!["21".to_string()]
                },
            ]
        );
        assert_eq!(report.count_of(ViolationKind::Referential), 2);
    }

    #[test]
    fn test_every_repeat_speaker_flagged() {
        let sessions = vec![
            Session::new("a", "", "Same", "T"),
            Session::new("b", "", "Same", "T"),
            Session::new("c", "", "Same", "T"),
        ];
        let catalog = Catalog::new(sessions).unwrap();
        let schedule = Schedule::new().with_slot("slot_1", ["a", "b", "c"]);

        let report = validator_for_small_grid().validate(&schedule, &catalog);
        let conflicts: Vec<_> = report
            .violations
            .iter()
            .filter(|v| v.kind() == ViolationKind::Constraint)
            .collect();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].to_string(), "slot_1: speaker 'Same' appears twice");
    }

    #[test]
    fn test_duplicates_listed_once() {
        let (catalog, schedule) = fixture();
        let mut row1: Vec<String> = schedule.get("slot_1").unwrap().to_vec();
        let mut row2: Vec<String> = schedule.get("slot_2").unwrap().to_vec();
        let mut row3: Vec<String> = schedule.get("slot_3").unwrap().to_vec();
        row1[0] = "50".to_string();
        row2[0] = "50".to_string();
        row3[0] = "50".to_string();
        let schedule = replace_row(&schedule, "slot_1", row1);
        let schedule = replace_row(&schedule, "slot_2", row2);
        let schedule = replace_row(&schedule, "slot_3", row3);

        let report = validate(&schedule, &catalog);
        let dupes: Vec<_> = report
            .violations
            .iter()
            .filter_map(|v| match v {
                Violation::DuplicateSessions { session_ids } => Some(session_ids.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(dupes, vec![vec!["50".to_string()]]);
    }

    #[test]
    fn test_repeat_in_one_slot_is_conflict_and_duplicate() {
        let (catalog, schedule) = fixture();
        let mut row: Vec<String> = schedule.get("slot_1").unwrap().to_vec();
        row[1] = "1".to_string();
        let schedule = replace_row(&schedule, "slot_1", row);

        let report = validate(&schedule, &catalog);
        assert_eq!(
            report.messages(),
            vec![
                "slot_1: speaker 'Speaker 1' appears twice",
                "Missing sessions: 2",
                "Duplicate session IDs: 1",
            ]
        );
        assert_eq!(report.count_of(ViolationKind::Constraint), 1);
        assert_eq!(report.count_of(ViolationKind::Referential), 2);
    }

    #[test]
    fn test_report_serializes_with_type_tag() {
        let violation = Violation::SlotSize {
            slot: "slot_2".to_string(),
            expected: 8,
            actual: 9,
        };
        let value = serde_json::to_value(&violation).unwrap();
        assert_eq!(value["type"], "slot_size");
        assert_eq!(violation.slot(), Some("slot_2"));
        assert_eq!(violation.kind(), ViolationKind::Structural);
    }

    fn validator_for_small_grid() -> Validator {
        Validator {
            slot_count: 1,
            room_count: 3,
        }
    }
}
