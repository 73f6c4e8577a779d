// Booking Relay Abstraction
//
// This crate provides the transport-agnostic core of the TimeRex → LINE relay:
// a booking event is parked under a correlation token until the same visitor
// follows the LINE account, at which point a confirmation is pushed.
//
// Key design decisions:
// - Uses traits (BookingStore, PushClient) for pluggable backends
// - Webhook payloads are parsed here so the HTTP layer only moves bytes
// - Errors distinguish caller mistakes (4xx) from internal failures (5xx)
// - Notifier failures are returned, never raised through the webhook path

pub mod booking;
pub mod error;
pub mod line_webhook;
pub mod notifier;
pub mod relay;
pub mod store;
pub mod timerex;

// In-memory implementations for tests and local runs
pub mod memory;

pub use booking::{BookingRecord, CorrelationToken, NO_URL, NO_ZOOM_URL, UNKNOWN_SCHEDULE};
pub use error::{RelayError, Result};
pub use line_webhook::{EventSource, LineEvent, LineWebhook};
pub use notifier::{MessageTemplate, Notifier, PushClient, DEFAULT_TEMPLATE};
pub use relay::{BookingOutcome, BookingRelay, FollowReport};
pub use store::{BookingStore, DEFAULT_BOOKING_TTL};
pub use timerex::{BookingDetails, MeetingProvider, TimeRexEvent, TimeRexPayload, WebhookType};
