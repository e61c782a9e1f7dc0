//! Hue bridge access.
//!
//! The poll loop only depends on [`SensorSource`]; [`HueClient`] is the
//! production implementation talking to the bridge's REST API.

mod client;

pub use client::HueClient;

use crate::error::Result;
use crate::sensors::SensorSnapshot;
use async_trait::async_trait;

/// Anything that can produce the bridge's current sensor collection.
///
/// Implementations report transient resets as
/// [`BridgeError::ConnectionReset`](crate::error::BridgeError::ConnectionReset);
/// every other error stops the poll loop.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn request_sensor_list(&self) -> Result<SensorSnapshot>;
}
