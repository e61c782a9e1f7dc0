//! Sensor snapshots, switch matching and change detection.
//!
//! The poll loop feeds every fetched [`SensorSnapshot`] through
//! [`match_all`] and compares the result with the previous cycle's
//! [`TrackedState`] using [`detect`].

mod detector;
mod matcher;
mod model;

pub use detector::{ChangeEvent, TrackedState, detect};
pub use matcher::{find_match, match_all};
pub use model::{SensorObject, SensorSnapshot};
