//! Session catalog and speaker grouping

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Result, ScheduleError};
use crate::schedule::id_from_value;

/// An accepted conference session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable, globally unique session id
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Abstract, already truncated by the catalog source
    #[serde(default)]
    pub description: String,
    /// Speaker identity; co-presenters share one composite string
    #[serde(alias = "speakers")]
    pub speaker: String,
    pub track: String,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        speaker: impl Into<String>,
        track: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            speaker: speaker.into(),
            track: track.into(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(id_from_value)
}

/// A speaker holding more than one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerConflict {
    pub speaker: String,
    /// Sorted session ids
    pub session_ids: Vec<String>,
}

/// The full ordered set of sessions to be scheduled
#[derive(Debug, Clone)]
pub struct Catalog {
    sessions: Vec<Session>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(sessions: Vec<Session>) -> Result<Self> {
        let mut index = HashMap::with_capacity(sessions.len());
        for (i, session) in sessions.iter().enumerate() {
            if index.insert(session.id.clone(), i).is_some() {
                return Err(ScheduleError::DuplicateSessionId {
                    id: session.id.clone(),
                });
            }
        }
        Ok(Self { sessions, index })
    }

    /// Parse a JSON array of session records
    pub fn from_json_str(content: &str) -> Result<Self> {
        let sessions: Vec<Session> = serde_json::from_str(content)?;
        Self::new(sessions)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.index.get(id).map(|&i| &self.sessions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Sessions in catalog order
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Speakers with more than one session, ordered by speaker.
    ///
    /// Grouping is exact string equality on `speaker`, the same equality
    /// the validator uses for in-slot conflicts.
    pub fn multi_session_speakers(&self) -> Vec<SpeakerConflict> {
        let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for session in &self.sessions {
            groups
                .entry(session.speaker.as_str())
                .or_default()
                .push(session.id.clone());
        }

        groups
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(speaker, mut session_ids)| {
                session_ids.sort();
                SpeakerConflict {
                    speaker: speaker.to_string(),
                    session_ids,
                }
            })
            .collect()
    }

    /// Sessions per track, most common first
    pub fn track_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for session in &self.sessions {
            *counts.entry(session.track.as_str()).or_default() += 1;
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(track, n)| (track.to_string(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
