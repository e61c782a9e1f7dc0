//! Button event codes reported by dimmer switches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// Semantic identifier for a physical button.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ButtonId {
    On,
    Off,
    Two,
    Three,
    Four,
    /// Code not present in the button table.
    Unknown,
}

/// Raw button event code to [`ButtonId`] mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonTable(BTreeMap<i64, ButtonId>);

impl ButtonTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_button(mut self, code: i64, button: ButtonId) -> Self {
        self.0.insert(code, button);
        self
    }

    /// Resolve a code. Total: unmapped codes give [`ButtonId::Unknown`].
    pub fn resolve_button(&self, code: i64) -> ButtonId {
        self.0.get(&code).copied().unwrap_or(ButtonId::Unknown)
    }
}

impl Default for ButtonTable {
    fn default() -> Self {
        Self::new()
            .with_button(34, ButtonId::Off)
            .with_button(16, ButtonId::Two)
            .with_button(17, ButtonId::Three)
            .with_button(18, ButtonId::Four)
    }
}
