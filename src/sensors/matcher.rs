//! Selecting the sensor behind each registered switch.

use super::detector::TrackedState;
use super::model::{SensorObject, SensorSnapshot};
use crate::switches::{SensorSelector, SwitchRegistry};

/// Find the sensor matching `selector`.
///
/// Ties go to the lowest sensor id in string order, since snapshots iterate
/// by id. Bridge unique ids make ties unlikely in practice.
pub fn find_match<'a>(
    snapshot: &'a SensorSnapshot,
    selector: &SensorSelector,
) -> Option<(&'a str, &'a SensorObject)> {
    snapshot
        .iter()
        .find(|(_, sensor)| selector.is_match(sensor))
        .map(|(id, sensor)| (id.as_str(), sensor))
}

/// Match every registered switch, producing the next tracked state.
///
/// The result has exactly one entry per registry entry.
pub fn match_all(snapshot: &SensorSnapshot, registry: &SwitchRegistry) -> TrackedState {
    registry
        .iter()
        .map(|(name, selector)| {
            let sensor = find_match(snapshot, selector).map(|(_, sensor)| sensor.clone());
            (name.clone(), sensor)
        })
        .collect()
}
