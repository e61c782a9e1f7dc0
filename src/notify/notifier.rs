//! Concrete notification sinks.

use super::{Notifier, Properties};
use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

/// Prints announcements to stdout and optionally speaks them.
///
/// Speech runs `<command> <message>` directly, without a shell, so the
/// message is always a single argument.
pub struct ConsoleNotifier {
    speech_command: Option<String>,
}

impl ConsoleNotifier {
    /// Create a notifier. `None` or an empty command disables speech.
    pub fn new(speech_command: Option<String>) -> Self {
        Self {
            speech_command: speech_command.filter(|cmd| !cmd.trim().is_empty()),
        }
    }

    /// Console output only.
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn speech_command(&self) -> Option<&str> {
        self.speech_command.as_deref()
    }

    async fn speak(&self, command: &str, message: &str) {
        match Command::new(command).arg(message).status().await {
            Ok(status) if status.success() => {
                debug!("[Notify] {} finished", command);
            }
            Ok(status) => {
                warn!("[Notify] {} exited with {}", command, status);
            }
            Err(e) => {
                warn!("[Notify] Failed to run {}: {}", command, e);
            }
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, message: &str, _properties: &Properties) {
        if let Some(command) = &self.speech_command {
            self.speak(command, message).await;
        }
        println!("{}", message);
    }
}
