// Notifier: renders the confirmation text and hands it to a push client
//
// The PushClient trait is implemented by rexline-line for the real LINE API
// and by `memory::RecordingPushClient` for tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::booking::BookingRecord;
use crate::error::{RelayError, Result};

const SCHEDULE_PLACEHOLDER: &str = "{schedule_time}";
const URL_PLACEHOLDER: &str = "{meeting_url}";

/// Default confirmation text
pub const DEFAULT_TEMPLATE: &str =
    "Your booking is confirmed!\n\nDate: {schedule_time}\nMeeting URL: {meeting_url}";

/// Trait for sending a plain text message to a messaging-platform user
#[async_trait]
pub trait PushClient: Send + Sync {
    /// Push `text` to the user identified by `to`
    async fn push_text(&self, to: &str, text: &str) -> Result<()>;
}

/// Confirmation message template with `{schedule_time}` and `{meeting_url}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    template: String,
}

impl MessageTemplate {
    /// Build a template; at least one placeholder must be present.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(SCHEDULE_PLACEHOLDER) && !template.contains(URL_PLACEHOLDER) {
            return Err(RelayError::config(format!(
                "message template must contain {} or {}",
                SCHEDULE_PLACEHOLDER, URL_PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    pub fn render(&self, record: &BookingRecord) -> String {
        self.template
            .replace(SCHEDULE_PLACEHOLDER, &record.schedule_time)
            .replace(URL_PLACEHOLDER, &record.meeting_url)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Formats booking confirmations and pushes them
#[derive(Clone)]
pub struct Notifier {
    client: Arc<dyn PushClient>,
    template: MessageTemplate,
}

impl Notifier {
    pub fn new(client: Arc<dyn PushClient>) -> Self {
        Self {
            client,
            template: MessageTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    /// Push the confirmation for `record` to `user_id`.
    ///
    /// Any failure comes back as [`RelayError::NotifierDelivery`]; callers on
    /// the webhook path log it and carry on.
    pub async fn notify(&self, user_id: &str, record: &BookingRecord) -> Result<()> {
        let text = self.template.render(record);
        self.client
            .push_text(user_id, &text)
            .await
            .map_err(|e| match e {
                RelayError::NotifierDelivery(_) => e,
                other => RelayError::delivery(other.to_string()),
            })?;

        tracing::info!(user_id = %user_id, "Booking confirmation pushed");
        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("template", &self.template.as_str())
            .finish_non_exhaustive()
    }
}
