// LINE Messaging API wire types

use serde::{Deserialize, Serialize};

/// Body of `POST /v2/bot/message/push`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessageRequest {
    /// User, group or room ID
    pub to: String,
    /// Up to five message objects
    pub messages: Vec<TextMessage>,
}

impl PushMessageRequest {
    pub fn text(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            messages: vec![TextMessage::new(text)],
        }
    }
}

/// Text message object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    /// Always "text"
    pub r#type: String,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Error body returned by the Messaging API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<LineErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
}

impl LineErrorResponse {
    /// One-line summary: top-level message followed by any property details
    pub fn summary(&self) -> Option<String> {
        let mut summary = self.message.clone()?;
        let details: Vec<String> = self
            .details
            .iter()
            .filter_map(|d| match (&d.property, &d.message) {
                (Some(property), Some(message)) => Some(format!("{}: {}", property, message)),
                (None, Some(message)) => Some(message.clone()),
                _ => None,
            })
            .collect();
        if !details.is_empty() {
            summary.push_str(" (");
            summary.push_str(&details.join("; "));
            summary.push(')');
        }
        Some(summary)
    }
}
