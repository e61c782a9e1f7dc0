//! Turns change events into announcements.

use super::{Notifier, Properties};
use crate::sensors::ChangeEvent;
use crate::switches::{ButtonId, ButtonTable};
use log::info;
use std::sync::Arc;

/// Formats a [`ChangeEvent`] and hands it to the notifier.
pub struct EventDispatcher {
    buttons: ButtonTable,
    notifier: Arc<dyn Notifier>,
}

impl EventDispatcher {
    pub fn new(buttons: ButtonTable, notifier: Arc<dyn Notifier>) -> Self {
        Self { buttons, notifier }
    }

    /// Announce one event. Unrecognised codes are announced as `unknown`.
    pub async fn dispatch(&self, event: &ChangeEvent) {
        let button = event.button(&self.buttons);
        let message = format_message(event, button);

        let mut properties = Properties::new();
        properties.insert("switch".to_string(), event.switch.to_string());
        properties.insert("button".to_string(), button.to_string());

        info!("[Poll] Switch event {:?}", properties);
        self.notifier.notify(&message, &properties).await;
    }
}

fn format_message(event: &ChangeEvent, button: ButtonId) -> String {
    format!("Button pressed! switch={} button={}", event.switch, button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::sensors::SensorObject;
    use crate::switches::SwitchName;
    use serde_json::json;

    fn event(button: serde_json::Value) -> ChangeEvent {
        ChangeEvent {
            switch: SwitchName::from("studio"),
            old: SensorObject::from(json!({ "state": { "lastupdated": "T1", "buttonevent": 34 } })),
            new: SensorObject::from(json!({ "state": { "lastupdated": "T2", "buttonevent": button } })),
        }
    }

    #[tokio::test]
    async fn test_dispatch_formats_message() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = EventDispatcher::new(ButtonTable::default(), notifier.clone());

        dispatcher.dispatch(&event(json!(34))).await;

        let calls = notifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Button pressed! switch=studio button=off");
        assert_eq!(calls[0].1.get("switch").map(String::as_str), Some("studio"));
        assert_eq!(calls[0].1.get("button").map(String::as_str), Some("off"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_code() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = EventDispatcher::new(ButtonTable::default(), notifier.clone());

        dispatcher.dispatch(&event(json!(1002))).await;

        let calls = notifier.calls();
        assert_eq!(calls[0].0, "Button pressed! switch=studio button=unknown");
        assert_eq!(calls[0].1.get("button").map(String::as_str), Some("unknown"));
    }
}
