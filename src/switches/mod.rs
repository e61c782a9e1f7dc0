//! Static switch and button configuration.
//!
//! Both tables are plain data handed to the poll loop at construction, so
//! tests can run against alternate registries.

mod buttons;
mod registry;

pub use buttons::{ButtonId, ButtonTable};
pub use registry::{SensorSelector, SwitchName, SwitchRegistry};
