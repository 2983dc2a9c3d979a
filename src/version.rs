//! Stored schedule versions

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schedule::Schedule;

/// One immutable, numbered schedule snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleVersion {
    /// Version number, starting at 1
    pub version: u64,
    /// Display label
    pub label: String,
    /// Free-text notes, may be empty
    #[serde(default)]
    pub description: String,
    /// Creation time, UTC with second precision
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
    /// Full snapshot, not a delta
    pub schedule: Schedule,
}

impl ScheduleVersion {
    /// Create a new version stamped with the current time.
    ///
    /// An empty or missing label becomes "Version {n}".
    pub fn new(
        version: u64,
        schedule: Schedule,
        label: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        let label = match label {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => format!("Version {}", version),
        };

        Self {
            version,
            label,
            description: description.unwrap_or_default().to_string(),
            created: Utc::now().trunc_subsecs(0),
            schedule,
        }
    }

    /// Creation date as `YYYY-MM-DD`
    pub fn created_date(&self) -> String {
        self.created.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for ScheduleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}: {} ({})", self.version, self.label, self.created_date())
    }
}

impl PartialEq for ScheduleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for ScheduleVersion {}

impl PartialOrd for ScheduleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduleVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version.cmp(&other.version)
    }
}

/// `2026-03-01T14:05:09Z` on disk
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
