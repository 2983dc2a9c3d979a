//! Schedule swap proposals submitted as issue text.
//!
//! A proposal body carries the `<!-- SCHEDULE_SWAP -->` marker and a fenced
//! JSON schedule, normally under a `### Proposed Schedule` heading.

use regex::Regex;

use crate::error::{Result, ScheduleError};
use crate::schedule::Schedule;

/// Marker that identifies a swap proposal
pub const SWAP_MARKER: &str = "<!-- SCHEDULE_SWAP -->";

/// Pulls a proposed schedule out of free-form issue text
pub struct SwapExtractor {
    /// JSON fence directly after the "Proposed Schedule" heading
    heading: Regex,
    /// Any JSON fence that mentions `slot_1`
    fallback: Regex,
}

impl SwapExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading: Regex::new(r"(?s)### Proposed Schedule\s*```json\s*(\{.*?\})\s*```")?,
            fallback: Regex::new(r#"(?s)```json\s*(\{[^`]*"slot_1"[^`]*\})\s*```"#)?,
        })
    }

    /// Extract and parse the proposed schedule
    pub fn extract(&self, body: &str) -> Result<Schedule> {
        if !body.contains(SWAP_MARKER) {
            return Err(ScheduleError::MissingSwapMarker);
        }

        let json = self
            .heading
            .captures(body)
            .or_else(|| self.fallback.captures(body))
            .and_then(|caps| caps.get(1))
            .ok_or(ScheduleError::SwapScheduleNotFound)?;

        Schedule::from_json_str(json.as_str())
    }
}
