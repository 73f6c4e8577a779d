// LINE push client
//
// Production PushClient for LINE's Messaging API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use rexline_core::error::{RelayError, Result};
use rexline_core::notifier::PushClient;

use crate::types::{LineErrorResponse, PushMessageRequest};

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

const PUSH_PATH: &str = "/v2/bot/message/push";

/// LINE rejects text messages longer than this many characters
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Errors from the LINE Messaging API
#[derive(Debug, Error)]
pub enum LineApiError {
    #[error("text message is {0} characters, LINE allows at most {max}", max = MAX_TEXT_LENGTH)]
    TextTooLong(usize),

    #[error("LINE API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LINE API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl From<LineApiError> for RelayError {
    fn from(err: LineApiError) -> Self {
        RelayError::delivery(err.to_string())
    }
}

/// LINE push client
///
/// # Example
///
/// ```ignore
/// use rexline_line::LinePushClient;
///
/// let client = LinePushClient::new("channel-access-token");
/// // or against a mock server
/// let client = LinePushClient::with_base_url("token", "http://localhost:8080");
/// ```
#[derive(Clone)]
pub struct LinePushClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl LinePushClient {
    /// Create a client for the public LINE API
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DEFAULT_API_BASE_URL)
    }

    /// Create a client with a custom API base URL
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn push_url(&self) -> String {
        format!("{}{}", self.base_url, PUSH_PATH)
    }

    /// Send one push request
    pub async fn push(&self, request: &PushMessageRequest) -> std::result::Result<(), LineApiError> {
        if let Some(too_long) = request
            .messages
            .iter()
            .map(|m| m.text.chars().count())
            .find(|len| *len > MAX_TEXT_LENGTH)
        {
            return Err(LineApiError::TextTooLong(too_long));
        }

        let response = self
            .client
            .post(self.push_url())
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(to = %request.to, "LINE push accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<LineErrorResponse>(&body)
            .ok()
            .and_then(|e| e.summary())
            .unwrap_or(body);

        Err(LineApiError::Api { status, message })
    }
}

#[async_trait]
impl PushClient for LinePushClient {
    async fn push_text(&self, to: &str, text: &str) -> Result<()> {
        self.push(&PushMessageRequest::text(to, text))
            .await
            .map_err(RelayError::from)
    }
}

impl std::fmt::Debug for LinePushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePushClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
