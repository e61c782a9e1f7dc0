use crate::error::{BridgeError, Result};
use crate::switches::{ButtonTable, SwitchRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: We're single-threaded at this point (called before any async runtime)
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Find the first '=' and split there
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();

            // Remove surrounding quotes if present
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key, value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub hue: HueConfig,
    pub poll: PollConfig,
    pub notify: NotifyConfig,
    pub switches: SwitchRegistry,
    pub buttons: ButtonTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Command used to speak announcements. `None` prints only.
    pub speech_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hue: HueConfig {
                host: "10.0.0.71".to_string(),
                port: 80,
                username: None,
            },
            poll: PollConfig { interval_ms: 200 },
            notify: NotifyConfig {
                speech_command: Some("say".to_string()),
            },
            switches: SwitchRegistry::default(),
            buttons: ButtonTable::default(),
        }
    }
}

impl Config {
    /// Build the configuration from environment variables on top of the defaults.
    ///
    /// Fails when `POLL_INTERVAL_MS` is not a number or `SWITCHES_FILE` is set
    /// and cannot be loaded.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HUE_IP") {
            config.hue.host = host;
        }
        if let Ok(port) = std::env::var("HUE_PORT")
            && let Ok(p) = port.parse()
        {
            config.hue.port = p;
        }
        if let Ok(username) = std::env::var("HUE_USERNAME")
            && !username.is_empty()
        {
            config.hue.username = Some(username);
        }

        if let Ok(interval) = std::env::var("POLL_INTERVAL_MS") {
            config.poll.interval_ms = parse_interval_ms(&interval)?;
        }

        if let Ok(command) = std::env::var("NOTIFY_SPEECH_COMMAND") {
            config.notify.speech_command = if command.trim().is_empty() {
                None
            } else {
                Some(command)
            };
        }

        if let Ok(path) = std::env::var("SWITCHES_FILE") {
            config.switches = load_switches(Path::new(&path))?;
        }

        Ok(config)
    }
}

fn parse_interval_ms(value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        BridgeError::Config(format!("POLL_INTERVAL_MS must be milliseconds, got {:?}", value))
    })
}

/// Read a switch registry from a JSON file of `{ name: { attribute: value } }`.
pub fn load_switches(path: &Path) -> Result<SwitchRegistry> {
    let content = fs::read_to_string(path).map_err(|e| {
        BridgeError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let registry: SwitchRegistry = serde_json::from_str(&content)?;
    if registry.is_empty() {
        return Err(BridgeError::Config(format!(
            "{} defines no switches",
            path.display()
        )));
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.hue.host, "10.0.0.71");
        assert_eq!(config.hue.port, 80);
        assert_eq!(config.poll.interval(), Duration::from_millis(200));
        assert!(config.switches.resolve_switch("studio").is_ok());
    }

    #[test]
    fn test_parse_interval_ms() {
        assert_eq!(parse_interval_ms("500").unwrap(), 500);
        assert_eq!(parse_interval_ms(" 0 ").unwrap(), 0);
        assert!(matches!(
            parse_interval_ms("200ms"),
            Err(BridgeError::Config(_))
        ));
        assert!(matches!(parse_interval_ms("-1"), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_parse_dotenv() {
        let pairs = parse_dotenv(
            "# bridge\nHUE_IP=10.0.0.5\n\nHUE_USERNAME = \"abc def\"\nPOLL_INTERVAL_MS='500'\nbogus\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("HUE_IP", "10.0.0.5"),
                ("HUE_USERNAME", "abc def"),
                ("POLL_INTERVAL_MS", "500"),
            ]
        );
    }

    #[test]
    fn test_load_switches() {
        let path = std::env::temp_dir().join(format!("switches-{}.json", std::process::id()));
        fs::write(&path, r#"{ "hall": { "uniqueid": "H" } }"#).unwrap();
        let registry = load_switches(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(registry.resolve_switch("hall").is_ok());
        assert!(registry.resolve_switch("studio").is_err());
    }

    #[test]
    fn test_load_switches_rejects_empty_registry() {
        let path = std::env::temp_dir().join(format!("no-switches-{}.json", std::process::id()));
        fs::write(&path, "{}").unwrap();
        let result = load_switches(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_load_switches_missing_file() {
        let result = load_switches(Path::new("/nonexistent/switches.json"));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
