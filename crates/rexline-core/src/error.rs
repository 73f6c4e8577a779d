// Error types for the booking relay

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while relaying a booking
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body is not valid JSON, or a field has the wrong JSON type
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Confirmed/cancelled event without usable `event` data
    #[error("'event' key is missing")]
    MissingEventData,

    /// Body matches neither the TimeRex nor the LINE webhook shape
    #[error("payload matches neither the TimeRex nor the LINE webhook shape")]
    UnrecognizedShape,

    /// Follow event arrived without a correlation token
    #[error("session ID is missing")]
    MissingSessionToken,

    /// Push to the messaging platform failed
    #[error("Notifier delivery failed: {0}")]
    NotifierDelivery(String),

    /// Invalid relay configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Correlation store failure
    #[error("Booking store error: {0}")]
    Store(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    /// Create a malformed payload error
    pub fn malformed(msg: impl Into<String>) -> Self {
        RelayError::MalformedPayload(msg.into())
    }

    /// Create a notifier delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        RelayError::NotifierDelivery(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        RelayError::Configuration(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        RelayError::Store(msg.into())
    }

    /// Whether the error is the caller's fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MalformedPayload(_)
                | RelayError::MissingEventData
                | RelayError::UnrecognizedShape
                | RelayError::MissingSessionToken
        )
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::MalformedPayload(err.to_string())
    }
}
