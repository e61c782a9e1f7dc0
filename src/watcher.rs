//! Entry point tying the bridge client, switch tables and notifier together.
//!
//! Foreground queries (`sensors`, `switch`) go straight to the bridge and
//! never touch the poll loop's tracked state.

use crate::config::Config;
use crate::error::Result;
use crate::hue::{HueClient, SensorSource};
use crate::notify::{ConsoleNotifier, EventDispatcher, Notifier};
use crate::sensors::{SensorObject, SensorSnapshot, find_match};
use crate::supervisor::PollSupervisor;
use crate::switches::{ButtonTable, SwitchRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct SwitchWatcher {
    source: Arc<dyn SensorSource>,
    switches: SwitchRegistry,
    buttons: ButtonTable,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
}

impl SwitchWatcher {
    pub fn new(
        source: Arc<dyn SensorSource>,
        switches: SwitchRegistry,
        buttons: ButtonTable,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            switches,
            buttons,
            notifier,
            interval,
        }
    }

    /// Build a watcher against the configured bridge, announcing on the console.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HueClient::new(&config.hue)?;
        let notifier = ConsoleNotifier::new(config.notify.speech_command.clone());
        Ok(Self::new(
            Arc::new(client),
            config.switches.clone(),
            config.buttons.clone(),
            Arc::new(notifier),
            config.poll.interval(),
        ))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn switches(&self) -> &SwitchRegistry {
        &self.switches
    }

    /// Fetch the bridge's current sensor collection.
    pub async fn sensors(&self) -> Result<SensorSnapshot> {
        self.source.request_sensor_list().await
    }

    /// Find the sensor currently backing switch `name`.
    ///
    /// Unknown names fail before anything is fetched.
    pub async fn switch(&self, name: &str) -> Result<Option<(String, SensorObject)>> {
        let selector = self.switches.resolve_switch(name)?;
        let snapshot = self.sensors().await?;
        Ok(find_match(&snapshot, selector).map(|(id, sensor)| (id.to_string(), sensor.clone())))
    }

    /// A fresh poll loop with empty tracked state.
    pub fn supervisor(&self) -> PollSupervisor {
        PollSupervisor::new(
            self.source.clone(),
            self.switches.clone(),
            EventDispatcher::new(self.buttons.clone(), self.notifier.clone()),
            self.interval,
        )
    }

    /// Spawn the poll loop in the background.
    pub fn start(&self, token: CancellationToken) -> JoinHandle<Result<()>> {
        self.supervisor().start(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::hue::testing::ScriptedSource;
    use crate::notify::testing::RecordingNotifier;
    use crate::switches::SensorSelector;
    use serde_json::json;

    fn watcher(source: Arc<ScriptedSource>) -> SwitchWatcher {
        SwitchWatcher::new(
            source,
            SwitchRegistry::new().with_switch("studio", SensorSelector::new().with("uniqueid", "A")),
            ButtonTable::default(),
            Arc::new(RecordingNotifier::default()),
            Duration::ZERO,
        )
    }

    fn bridge_sensors() -> SensorSnapshot {
        serde_json::from_value(json!({
            "1": { "name": "Daylight", "state": { "daylight": false } },
            "4": { "uniqueid": "A", "state": { "buttonevent": 17, "lastupdated": "T3" } }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_switch_lookup() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(bridge_sensors())]));
        let watcher = watcher(source);

        let (id, sensor) = watcher.switch("studio").await.unwrap().unwrap();
        assert_eq!(id, "4");
        assert_eq!(sensor.button_event(), Some(17));
    }

    #[tokio::test]
    async fn test_switch_without_matching_sensor() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(SensorSnapshot::new())]));
        let watcher = watcher(source);
        assert!(watcher.switch("studio").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_switch_does_not_fetch() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let watcher = watcher(source.clone());

        let err = watcher.switch("kitchen").await.unwrap_err();
        assert!(matches!(err, BridgeError::UnknownSwitch(name) if name == "kitchen"));
        assert_eq!(source.requests(), 0);
    }

    #[tokio::test]
    async fn test_sensors_passes_through() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(bridge_sensors())]));
        let watcher = watcher(source);
        assert_eq!(watcher.sensors().await.unwrap(), bridge_sensors());
    }

    #[test]
    fn test_from_config_requires_username() {
        let config = Config::default();
        assert!(matches!(
            SwitchWatcher::from_config(&config),
            Err(BridgeError::Config(_))
        ));
    }
}
