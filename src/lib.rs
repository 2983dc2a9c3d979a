//! Conference Schedule Engine
//!
//! Validates, scores, stores and diffs assignments of conference sessions
//! to a fixed grid of 7 time slots by 8 rooms. Schedules are produced
//! elsewhere (by hand or by an automated proposer); this crate only judges
//! and records them.
//!
//! ## Features
//!
//! - **Complete Diagnostics**: Every violated constraint is reported in one pass
//! - **Track Distribution**: Per-slot track tallies and doubling counts
//! - **Append-Only History**: Numbered snapshots in a single JSON file
//! - **Change Highlighting**: Changed cells between consecutive versions
//!
//! ## Flow
//!
//! ```text
//! producer ──> Schedule ──> Validator ──ok──> track_stats
//!                               │                 │
//!                               └──────> VersionStore::append
//!                                               │
//!                                        diff(vN, vN-1) ──> presentation
//! ```

pub mod catalog;
pub mod checksum;
pub mod config;
pub mod diff;
pub mod distribution;
pub mod error;
pub mod schedule;
pub mod store;
pub mod swap;
pub mod validation;
pub mod venue;
pub mod version;

pub use catalog::{Catalog, Session, SpeakerConflict};
pub use checksum::Checksum;
pub use config::ScheduleConfig;
pub use diff::{diff, diff_schedules, Cell, DiffSet};
pub use distribution::{track_stats, SlotTracks, TrackStats};
pub use error::{Result, ScheduleError};
pub use schedule::Schedule;
pub use store::VersionStore;
pub use swap::SwapExtractor;
pub use validation::{validate, ValidationReport, Validator, Violation, ViolationKind};
pub use venue::{Room, Slot, VenueLayout, ROOM_COUNT, SLOT_COUNT};
pub use version::ScheduleVersion;
