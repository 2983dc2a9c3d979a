//! Snapshot fingerprints

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schedule::Schedule;

/// SHA256 fingerprint of a schedule snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Fingerprint a schedule over its canonical JSON (slot keys sorted)
    pub fn of_schedule(schedule: &Schedule) -> Self {
        let canonical = serde_json::to_vec(schedule).unwrap_or_default();
        Self::from_bytes(&canonical)
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines and listings
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_schedules_match() {
        let a = Schedule::new().with_slot("slot_1", ["1", "2"]);
        let b = Schedule::from_json_str(r#"{"slot_1": [1, 2]}"#).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_position_swap_changes_fingerprint() {
        let a = Schedule::new().with_slot("slot_1", ["1", "2"]);
        let b = Schedule::new().with_slot("slot_1", ["2", "1"]);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().short().len(), 12);
    }
}
