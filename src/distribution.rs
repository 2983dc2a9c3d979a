//! Track distribution metrics.
//!
//! A "doubling" is each same-track session beyond the first within one
//! slot. Fewer doublings means more track variety per slot; the numbers are
//! descriptive only and never fail a schedule.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::schedule::Schedule;

/// Track tallies for one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotTracks {
    pub slot: String,
    pub counts: BTreeMap<String, usize>,
}

impl SlotTracks {
    pub fn unique_tracks(&self) -> usize {
        self.counts.len()
    }

    /// Tracks appearing more than once in this slot
    pub fn doubled(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .filter(|&(_, &n)| n > 1)
            .map(|(track, &n)| (track.as_str(), n))
    }

    pub fn doublings(&self) -> usize {
        self.counts.values().map(|&n| n.saturating_sub(1)).sum()
    }
}

/// Per-slot track counts plus the schedule-wide doubling total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackStats {
    /// In slot processing order
    pub slots: Vec<SlotTracks>,
    pub total_doublings: usize,
}

impl TrackStats {
    pub fn slot(&self, name: &str) -> Option<&SlotTracks> {
        self.slots.iter().find(|s| s.slot == name)
    }
}

/// Tally tracks per slot. Ids unknown to the catalog are skipped.
pub fn track_stats(schedule: &Schedule, catalog: &Catalog) -> TrackStats {
    let slots: Vec<SlotTracks> = schedule
        .iter()
        .map(|(slot, ids)| {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for session in ids.iter().filter_map(|id| catalog.get(id)) {
                *counts.entry(session.track.clone()).or_default() += 1;
            }
            SlotTracks {
                slot: slot.to_string(),
                counts,
            }
        })
        .collect();

    let total_doublings = slots.iter().map(SlotTracks::doublings).sum();
    TrackStats {
        slots,
        total_doublings,
    }
}
