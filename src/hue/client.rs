//! REST client for the bridge's sensor registry.

use super::SensorSource;
use crate::config::HueConfig;
use crate::error::{BridgeError, Result};
use crate::sensors::SensorSnapshot;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::error::Error as StdError;
use std::io;
use std::net::Ipv6Addr;

/// Upper bound for a `/sensors` body. A full bridge reports well under 1 MiB.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Client for one Hue bridge, authenticated by its whitelisted username.
#[derive(Debug, Clone)]
pub struct HueClient {
    http: reqwest::Client,
    sensors_url: String,
}

impl HueClient {
    /// Create a client from configuration. Fails without a username.
    pub fn new(config: &HueConfig) -> Result<Self> {
        let username = config
            .username
            .as_deref()
            .ok_or_else(|| BridgeError::Config("HUE_USERNAME is not set".to_string()))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(BridgeError::RequestError)?;

        Ok(Self {
            http,
            sensors_url: sensors_url(&config.host, config.port, username),
        })
    }
}

#[async_trait]
impl SensorSource for HueClient {
    async fn request_sensor_list(&self) -> Result<SensorSnapshot> {
        let response = self
            .http
            .get(&self.sensors_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = read_body(response, MAX_BODY_BYTES).await?;
        let snapshot = parse_sensor_list(&body)?;
        debug!("[Hue] Bridge reported {} sensors", snapshot.len());
        Ok(snapshot)
    }
}

/// IPv6 literals need brackets inside a URL authority.
fn sensors_url(host: &str, port: u16, username: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("http://[{}]:{}/api/{}/sensors", host, port, username)
    } else {
        format!("http://{}:{}/api/{}/sensors", host, port, username)
    }
}

/// Connection resets are the one transport failure the poll loop retries.
///
/// The reset surfaces as an `io::Error` somewhere down the source chain.
fn classify_request_error(e: reqwest::Error) -> BridgeError {
    let mut source = e.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>()
            && io_err.kind() == io::ErrorKind::ConnectionReset
        {
            return BridgeError::ConnectionReset(e.to_string());
        }
        source = err.source();
    }
    BridgeError::RequestError(e)
}

async fn read_body(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>> {
    if let Some(len) = response.content_length()
        && len > limit as u64
    {
        return Err(BridgeError::InvalidResponse(format!(
            "body of {} bytes exceeds {} byte limit",
            len, limit
        )));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(classify_request_error)? {
        if body.len() + chunk.len() > limit {
            return Err(BridgeError::InvalidResponse(format!(
                "body exceeds {} byte limit",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parse a `/sensors` body.
///
/// Success is a JSON object keyed by sensor id. Failures (e.g. an
/// unauthorized username) come back as an array of `{"error": {...}}`.
fn parse_sensor_list(body: &[u8]) -> Result<SensorSnapshot> {
    match serde_json::from_slice::<Value>(body)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        Value::Array(items) => {
            let error = items
                .iter()
                .find_map(|item| item.get("error"))
                .ok_or_else(|| {
                    BridgeError::InvalidResponse("unexpected array response".to_string())
                })?;
            Err(BridgeError::Api {
                kind: error.get("type").and_then(Value::as_i64).unwrap_or_default(),
                address: error
                    .get("address")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                description: error
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        }
        other => Err(BridgeError::InvalidResponse(format!(
            "expected sensor object, got {}",
            other
        ))),
    }
}
