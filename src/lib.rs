//! Hue switch watcher library.
//!
//! Polls a Hue bridge's sensor registry, detects wall switch button presses
//! and announces them locally.

pub mod config;
pub mod error;
pub mod hue;
pub mod notify;
pub mod sensors;
pub mod supervisor;
pub mod switches;
pub mod watcher;

pub use error::{BridgeError, Result};
pub use supervisor::{PollPhase, PollStats, PollSupervisor};
pub use watcher::SwitchWatcher;
