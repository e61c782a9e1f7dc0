//! Change detection between two consecutive poll cycles.

use super::model::SensorObject;
use crate::switches::{ButtonId, ButtonTable, SwitchName};
use std::collections::BTreeMap;

/// Last matched sensor per switch, `None` when nothing matched.
///
/// Built fresh by [`super::match_all`] each cycle and swapped in whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedState(BTreeMap<SwitchName, Option<SensorObject>>);

impl TrackedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched sensor for `switch`, if it is tracked and matched.
    pub fn get(&self, switch: &SwitchName) -> Option<&SensorObject> {
        self.0.get(switch).and_then(Option::as_ref)
    }

    /// Whether `switch` has an entry, matched or not.
    pub fn contains(&self, switch: &SwitchName) -> bool {
        self.0.contains_key(switch)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SwitchName, Option<&SensorObject>)> {
        self.0.iter().map(|(name, sensor)| (name, sensor.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SwitchName, Option<SensorObject>)> for TrackedState {
    fn from_iter<I: IntoIterator<Item = (SwitchName, Option<SensorObject>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A reportable change on one switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub switch: SwitchName,
    pub old: SensorObject,
    pub new: SensorObject,
}

impl ChangeEvent {
    /// Button behind the new sensor state. Sensors without an integer
    /// `buttonevent` resolve to [`ButtonId::Unknown`].
    pub fn button(&self, buttons: &ButtonTable) -> ButtonId {
        self.new
            .button_event()
            .map(|code| buttons.resolve_button(code))
            .unwrap_or(ButtonId::Unknown)
    }
}

/// Compare two tracked states.
///
/// Yields one event per switch whose old and new sensors both exist and whose
/// `lastupdated` differs, in switch name order. A switch appearing or
/// disappearing between cycles is not an event.
pub fn detect<'a>(
    old: &'a TrackedState,
    new: &'a TrackedState,
) -> impl Iterator<Item = ChangeEvent> + 'a {
    old.iter().filter_map(move |(switch, old_sensor)| {
        let old_sensor = old_sensor?;
        let new_sensor = new.get(switch)?;
        (old_sensor.last_updated() != new_sensor.last_updated()).then(|| ChangeEvent {
            switch: switch.clone(),
            old: old_sensor.clone(),
            new: new_sensor.clone(),
        })
    })
}
