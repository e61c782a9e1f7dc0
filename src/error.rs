use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum BridgeError {
    #[error("No switch named {0} defined")]
    UnknownSwitch(String),

    #[error("Connection to bridge was reset: {0}")]
    ConnectionReset(String),

    #[error("Bridge returned HTTP {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("Bridge API error {kind} at {address}: {description}")]
    Api {
        kind: i64,
        address: String,
        description: String,
    },

    #[error("Invalid bridge response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Bridge request failed: {0}")]
    RequestError(reqwest::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl BridgeError {
    /// Whether the poll loop retries this error instead of stopping.
    ///
    /// Only connection resets qualify; everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::ConnectionReset(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
