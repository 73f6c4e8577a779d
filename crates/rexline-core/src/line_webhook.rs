// LINE Messaging API webhook payloads
//
// Only the fields needed to detect follow events are modeled; everything
// else LINE sends is ignored by serde.

use serde::Deserialize;

use crate::error::Result;

/// Event type LINE sends when a user adds the official account as a friend
pub const FOLLOW_EVENT: &str = "follow";

/// Webhook request body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineWebhook {
    /// Bot user ID that received the events
    #[serde(default)]
    pub destination: Option<String>,
    /// Events may be batched; an empty list is a connectivity check
    #[serde(default)]
    pub events: Vec<LineEvent>,
}

impl LineWebhook {
    pub fn parse(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Events with `type == "follow"`, in delivery order
    pub fn follow_events(&self) -> impl Iterator<Item = &LineEvent> {
        self.events.iter().filter(|event| event.is_follow())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub source: Option<EventSource>,
}

impl LineEvent {
    pub fn is_follow(&self) -> bool {
        self.kind == FOLLOW_EVENT
    }

    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref()?.user_id.as_deref()
    }
}

/// Where the event came from; only user sources carry a `userId`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use serde_json::json;

    #[test]
    fn test_parse_follow_event() {
        let body = json!({
            "destination": "Uxxxxxxxxxxxxxx",
            "events": [{
                "type": "follow",
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "timestamp": 1_700_000_000_000_i64,
                "source": {"type": "user", "userId": "U4af4980629"},
                "mode": "active"
            }]
        });

        let webhook = LineWebhook::parse(body.to_string().as_bytes()).unwrap();
        let follows: Vec<_> = webhook.follow_events().collect();
        assert_eq!(follows.len(), 1);
        assert_eq!(follows[0].user_id(), Some("U4af4980629"));
        assert_eq!(webhook.destination.as_deref(), Some("Uxxxxxxxxxxxxxx"));
    }

    #[test]
    fn test_non_follow_events_are_filtered() {
        let body = json!({"events": [
            {"type": "message", "source": {"type": "user", "userId": "U1"}},
            {"type": "unfollow", "source": {"type": "user", "userId": "U2"}},
            {"type": "follow", "source": {"type": "user", "userId": "U3"}}
        ]});
        let webhook = LineWebhook::parse(body.to_string().as_bytes()).unwrap();
        let users: Vec<_> = webhook.follow_events().filter_map(LineEvent::user_id).collect();
        assert_eq!(users, vec!["U3"]);
    }

    #[test]
    fn test_missing_events_is_empty() {
        let webhook = LineWebhook::parse(b"{}").unwrap();
        assert!(webhook.events.is_empty());
    }

    #[test]
    fn test_follow_without_source() {
        let webhook = LineWebhook::parse(br#"{"events":[{"type":"follow"}]}"#).unwrap();
        assert_eq!(webhook.events[0].user_id(), None);
    }

    #[test]
    fn test_invalid_body() {
        assert!(matches!(
            LineWebhook::parse(b"not json"),
            Err(RelayError::MalformedPayload(_))
        ));
    }
}
