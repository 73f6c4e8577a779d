// TimeRex webhook payloads
//
// TimeRex posts JSON, but not always with a JSON content type, so parsing
// works on raw bytes. A LINE-shaped body (an `events` key) is acknowledged
// rather than rejected.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::booking::{NO_URL, NO_ZOOM_URL, UNKNOWN_SCHEDULE};
use crate::error::{RelayError, Result};

/// Webhook types that carry a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookType {
    EventConfirmed,
    EventCancelled,
}

impl WebhookType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "event_confirmed" => Some(WebhookType::EventConfirmed),
            "event_cancelled" => Some(WebhookType::EventCancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookType::EventConfirmed => "event_confirmed",
            WebhookType::EventCancelled => "event_cancelled",
        }
    }
}

/// `event.online_meeting_provider` comes either as an object with a `url`
/// or as a bare provider name such as `"zoom"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MeetingProvider {
    Structured(Map<String, Value>),
    Named(String),
    Other(Value),
}

/// The subset of a TimeRex `event` object the relay cares about.
///
/// `zoom_meeting` stays untyped: it is only consulted when the provider is
/// `"zoom"`, and its shape varies with the account's Zoom integration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeRexEvent {
    #[serde(default)]
    pub local_start_datetime: Option<String>,
    #[serde(default)]
    pub online_meeting_provider: Option<MeetingProvider>,
    #[serde(default)]
    pub zoom_meeting: Option<Value>,
}

impl TimeRexEvent {
    pub fn schedule_time(&self) -> String {
        self.local_start_datetime
            .clone()
            .unwrap_or_else(|| UNKNOWN_SCHEDULE.to_string())
    }

    /// Resolve the meeting URL: structured provider first, then Zoom, then the sentinel.
    pub fn meeting_url(&self) -> String {
        match &self.online_meeting_provider {
            Some(MeetingProvider::Structured(fields)) => url_text(fields.get("url"), NO_URL),
            Some(MeetingProvider::Named(name)) if name == "zoom" => url_text(
                self.zoom_meeting
                    .as_ref()
                    .and_then(|zoom| zoom.get("join_url")),
                NO_ZOOM_URL,
            ),
            _ => NO_URL.to_string(),
        }
    }

    pub fn booking_details(&self) -> BookingDetails {
        BookingDetails {
            schedule_time: self.schedule_time(),
            meeting_url: self.meeting_url(),
        }
    }
}

/// Missing or null URLs become the sentinel; other non-string values are kept as JSON text
fn url_text(value: Option<&Value>, sentinel: &str) -> String {
    match value {
        None | Some(Value::Null) => sentinel.to_string(),
        Some(Value::String(url)) => url.clone(),
        Some(other) => {
            tracing::warn!(url = %other, "Meeting URL is not a string, storing its JSON text");
            other.to_string()
        }
    }
}

/// Booking fields extracted from a confirmed or cancelled event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub schedule_time: String,
    pub meeting_url: String,
}

/// What a body posted to the TimeRex endpoint turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum TimeRexPayload {
    Booking {
        webhook_type: WebhookType,
        details: BookingDetails,
    },
    /// LINE-shaped body (`events` key); acknowledged without side effects
    LineEvents { count: usize },
}

impl TimeRexPayload {
    /// Parse a raw request body regardless of its declared content type.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        let Value::Object(mut fields) = value else {
            return Err(RelayError::UnrecognizedShape);
        };

        let webhook_type = fields
            .get("webhook_type")
            .and_then(Value::as_str)
            .and_then(WebhookType::from_name);

        if let Some(webhook_type) = webhook_type {
            let event = match fields.remove("event") {
                Some(Value::Object(event)) if !event.is_empty() => event,
                _ => return Err(RelayError::MissingEventData),
            };
            let event: TimeRexEvent = serde_json::from_value(Value::Object(event))?;
            return Ok(TimeRexPayload::Booking {
                webhook_type,
                details: event.booking_details(),
            });
        }

        match fields.get("events") {
            Some(events) => Ok(TimeRexPayload::LineEvents {
                count: events.as_array().map(Vec::len).unwrap_or(0),
            }),
            None => Err(RelayError::UnrecognizedShape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<TimeRexPayload> {
        TimeRexPayload::parse(value.to_string().as_bytes())
    }

    fn details(value: Value) -> BookingDetails {
        match parse(value).unwrap() {
            TimeRexPayload::Booking { details, .. } => details,
            other => panic!("expected booking, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_provider_url_wins() {
        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {
                "local_start_datetime": "2024-01-01 10:00",
                "online_meeting_provider": {"url": "https://zoom.us/j/123"},
                "zoom_meeting": {"join_url": "https://zoom.us/j/ignored"}
            }
        }));
        assert_eq!(d.schedule_time, "2024-01-01 10:00");
        assert_eq!(d.meeting_url, "https://zoom.us/j/123");
    }

    #[test]
    fn test_structured_provider_without_url() {
        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {"online_meeting_provider": {"name": "meet"}}
        }));
        assert_eq!(d.meeting_url, NO_URL);
    }

    #[test]
    fn test_zoom_provider_uses_join_url() {
        let d = details(json!({
            "webhook_type": "event_cancelled",
            "event": {
                "online_meeting_provider": "zoom",
                "zoom_meeting": {"join_url": "https://zoom.us/j/456"}
            }
        }));
        assert_eq!(d.meeting_url, "https://zoom.us/j/456");
        assert_eq!(d.schedule_time, UNKNOWN_SCHEDULE);
    }

    #[test]
    fn test_structured_provider_ignores_unexpected_zoom_meeting() {
        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {
                "local_start_datetime": "2024-01-01 10:00",
                "online_meeting_provider": {"url": "https://meet.example/abc"},
                "zoom_meeting": "not configured"
            }
        }));
        assert_eq!(d.meeting_url, "https://meet.example/abc");
        assert_eq!(d.schedule_time, "2024-01-01 10:00");
    }

    #[test]
    fn test_non_string_urls_are_kept_as_text() {
        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {"online_meeting_provider": {"url": 12345}}
        }));
        assert_eq!(d.meeting_url, "12345");

        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {"online_meeting_provider": {"url": null}}
        }));
        assert_eq!(d.meeting_url, NO_URL);
    }

    #[test]
    fn test_zoom_meeting_of_unexpected_shape() {
        for zoom in [json!("pending"), json!({"id": 1}), json!({"join_url": null})] {
            let d = details(json!({
                "webhook_type": "event_confirmed",
                "event": {"online_meeting_provider": "zoom", "zoom_meeting": zoom}
            }));
            assert_eq!(d.meeting_url, NO_ZOOM_URL, "zoom_meeting {}", zoom);
        }
    }

    #[test]
    fn test_zoom_provider_without_meeting() {
        let d = details(json!({
            "webhook_type": "event_confirmed",
            "event": {"online_meeting_provider": "zoom"}
        }));
        assert_eq!(d.meeting_url, NO_ZOOM_URL);
    }

    #[test]
    fn test_other_provider_shapes_fall_back() {
        for provider in [json!("google_meet"), json!(42), json!(null), json!([1, 2])] {
            let d = details(json!({
                "webhook_type": "event_confirmed",
                "event": {
                    "local_start_datetime": "2024-05-05 09:30",
                    "online_meeting_provider": provider,
                    "zoom_meeting": {"join_url": "https://zoom.us/j/789"}
                }
            }));
            assert_eq!(d.meeting_url, NO_URL, "provider {}", provider);
        }
    }

    #[test]
    fn test_cancelled_event_is_a_booking() {
        let payload = parse(json!({
            "webhook_type": "event_cancelled",
            "event": {"local_start_datetime": "2024-01-02 11:00"}
        }))
        .unwrap();
        assert!(matches!(
            payload,
            TimeRexPayload::Booking {
                webhook_type: WebhookType::EventCancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_or_empty_event() {
        for body in [
            json!({"webhook_type": "event_confirmed"}),
            json!({"webhook_type": "event_confirmed", "event": null}),
            json!({"webhook_type": "event_confirmed", "event": {}}),
            json!({"webhook_type": "event_confirmed", "event": "soon"}),
        ] {
            assert!(matches!(parse(body), Err(RelayError::MissingEventData)));
        }
    }

    #[test]
    fn test_wrongly_typed_event_field_is_malformed() {
        let result = parse(json!({
            "webhook_type": "event_confirmed",
            "event": {"local_start_datetime": 1704099600}
        }));
        assert!(matches!(result, Err(RelayError::MalformedPayload(_))));
    }

    #[test]
    fn test_line_shaped_body_is_acknowledged() {
        let payload = parse(json!({"events": [{"type": "follow"}, {"type": "message"}]})).unwrap();
        assert_eq!(payload, TimeRexPayload::LineEvents { count: 2 });
    }

    #[test]
    fn test_booking_type_wins_over_events_key() {
        let payload = parse(json!({
            "webhook_type": "event_confirmed",
            "event": {"local_start_datetime": "2024-01-01 10:00"},
            "events": []
        }))
        .unwrap();
        assert!(matches!(payload, TimeRexPayload::Booking { .. }));
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(matches!(
            parse(json!({"webhook_type": "other"})),
            Err(RelayError::UnrecognizedShape)
        ));
        assert!(matches!(
            parse(json!([1, 2, 3])),
            Err(RelayError::UnrecognizedShape)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            TimeRexPayload::parse(b"webhook_type=event_confirmed"),
            Err(RelayError::MalformedPayload(_))
        ));
    }
}
