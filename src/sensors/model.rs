//! Sensor records as reported by the bridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One bridge-reported sensor record.
///
/// Kept as the raw attribute map so selectors can match on any attribute the
/// bridge exposes (`uniqueid`, `modelid`, `name`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorObject(Map<String, Value>);

impl SensorObject {
    /// Get a top-level attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `state` sub-object, if present.
    pub fn state(&self) -> Option<&Map<String, Value>> {
        self.0.get("state").and_then(Value::as_object)
    }

    /// `state.lastupdated`. The bridge reports `"none"` for never-touched sensors.
    pub fn last_updated(&self) -> Option<&Value> {
        self.state().and_then(|state| state.get("lastupdated"))
    }

    /// `state.buttonevent`, if the sensor reports an integer code.
    pub fn button_event(&self) -> Option<i64> {
        self.state()
            .and_then(|state| state.get("buttonevent"))
            .and_then(Value::as_i64)
    }
}

impl From<Value> for SensorObject {
    /// Non-object values become an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Full sensor collection at one point in time, keyed by bridge sensor id.
///
/// Iteration is ordered by sensor id, which is what makes matching stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot(BTreeMap<String, SensorObject>);

impl SensorSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, sensor: SensorObject) {
        self.0.insert(id.into(), sensor);
    }

    pub fn get(&self, id: &str) -> Option<&SensorObject> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SensorObject)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SensorObject)> for SensorSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, SensorObject)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
