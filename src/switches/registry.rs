//! Logical switch names and the selectors that find them among bridge sensors.

use crate::error::{BridgeError, Result};
use crate::sensors::SensorObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::borrow::Borrow;
use std::fmt;

/// Name of a logical wall switch, e.g. `studio`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchName(String);

impl SwitchName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SwitchName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SwitchName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Attribute-equality predicate identifying one sensor.
///
/// A sensor matches iff every selector key is present on it with an equal value.
/// An empty selector matches any sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSelector(BTreeMap<String, Value>);

impl SensorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to equal `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_match(&self, sensor: &SensorObject) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| sensor.get(key) == Some(expected))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Switch name to selector mapping. Iterates in name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchRegistry(BTreeMap<SwitchName, SensorSelector>);

impl SwitchRegistry {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Register a switch, replacing any previous selector under that name.
    pub fn with_switch(mut self, name: impl Into<SwitchName>, selector: SensorSelector) -> Self {
        self.0.insert(name.into(), selector);
        self
    }

    /// Look up the selector for `name`.
    pub fn resolve_switch(&self, name: &str) -> Result<&SensorSelector> {
        self.0
            .get(name)
            .ok_or_else(|| BridgeError::UnknownSwitch(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SwitchName, &SensorSelector)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &SwitchName> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SwitchRegistry {
    /// The single studio dimmer switch.
    fn default() -> Self {
        Self::new().with_switch(
            "studio",
            SensorSelector::new().with("uniqueid", "00:00:00:00:00:47:12:96-f2"),
        )
    }
}
