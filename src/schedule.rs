//! Schedule exchange format
//!
//! A schedule maps slot keys to room-ordered arrays of session ids:
//!
//! ```json
//! { "slot_1": ["12", "4", "33", "7", "41", "19", "2", "50"], "slot_2": [...] }
//! ```
//!
//! Ids are always strings once parsed; producers that emit numbers are
//! normalized on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::checksum::Checksum;
use crate::error::Result;
use crate::venue::slot_order;

/// Convert a JSON scalar to its session id string.
///
/// Non-string values use their JSON text, so `null` and `true` become
/// `"null"` and `"true"`; these never match a catalog id.
pub(crate) fn id_from_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// A candidate assignment of sessions to slots and rooms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    slots: BTreeMap<String, Vec<String>>,
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Vec<serde_json::Value>>::deserialize(deserializer)?;
        let slots = raw
            .into_iter()
            .map(|(slot, ids)| (slot, ids.into_iter().map(id_from_value).collect()))
            .collect();
        Ok(Self { slots })
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a slot row while building a schedule
    pub fn with_slot<I, S>(mut self, slot: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots
            .insert(slot.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Session ids for a slot, in room order
    pub fn get(&self, slot: &str) -> Option<&[String]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Slot keys in processing order
    pub fn slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        names.sort_by(|a, b| slot_order(a, b));
        names
    }

    /// Slot rows in processing order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slot_names()
            .into_iter()
            .map(move |name| (name, self.slots[name].as_slice()))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Every assigned id across all slots, with repeats
    pub fn assigned_ids(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
    }

    /// Content fingerprint of this snapshot
    pub fn fingerprint(&self) -> Checksum {
        Checksum::of_schedule(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_normalized() {
        let schedule = Schedule::from_json_str(r#"{"slot_1": [1, "2", 3]}"#).unwrap();
        assert_eq!(schedule.get("slot_1").unwrap(), ["1", "2", "3"]);
    }

    #[test]
    fn test_non_string_ids_use_json_text() {
        let schedule = Schedule::from_json_str(r#"{"slot_1": [null, true, 1.5]}"#).unwrap();
        assert_eq!(schedule.get("slot_1").unwrap(), ["null", "true", "1.5"]);
    }

    #[test]
    fn test_iter_follows_slot_order() {
        let schedule = Schedule::new()
            .with_slot("slot_10", ["c"])
            .with_slot("slot_2", ["b"])
            .with_slot("slot_1", ["a"]);
        let names: Vec<_> = schedule.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["slot_1", "slot_2", "slot_10"]);
        let ids: Vec<_> = schedule.assigned_ids().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let schedule = Schedule::new().with_slot("slot_1", ["7", "8"]);
        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value, serde_json::json!({"slot_1": ["7", "8"]}));
    }
}
