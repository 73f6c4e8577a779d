// Booking relay
//
// Ties the two webhooks together:
//   TimeRex booking → store under a new token → (visitor follows on LINE)
//   → LINE follow event + token → lookup → push confirmation
//
// The HTTP layer owns the token transport; this type only sees an
// `Option<CorrelationToken>`.

use std::sync::Arc;

use crate::booking::{BookingRecord, CorrelationToken};
use crate::error::{RelayError, Result};
use crate::line_webhook::LineWebhook;
use crate::notifier::Notifier;
use crate::store::BookingStore;
use crate::timerex::TimeRexPayload;

/// Result of a body posted to the TimeRex endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// A booking was parked; the caller must hand `token` to the visitor
    Stored {
        token: CorrelationToken,
        record: BookingRecord,
    },
    /// LINE-shaped body, nothing stored
    Acknowledged { events: usize },
}

/// Per-request tally of follow event handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowReport {
    pub follow_events: usize,
    pub notified: usize,
    pub not_found: usize,
    pub delivery_failures: usize,
    /// Follow events without a user id
    pub skipped: usize,
}

/// Relay service shared by both webhook handlers
#[derive(Clone)]
pub struct BookingRelay {
    store: Arc<dyn BookingStore>,
    notifier: Notifier,
    consume_on_delivery: bool,
}

impl BookingRelay {
    pub fn new(store: Arc<dyn BookingStore>, notifier: Notifier) -> Self {
        Self {
            store,
            notifier,
            consume_on_delivery: false,
        }
    }

    /// Delete the booking once its confirmation was pushed successfully.
    ///
    /// Off by default: a record stays claimable until it expires.
    pub fn consume_on_delivery(mut self, enabled: bool) -> Self {
        self.consume_on_delivery = enabled;
        self
    }

    /// Handle a body posted by TimeRex.
    pub async fn receive_booking(&self, body: &[u8]) -> Result<BookingOutcome> {
        let payload = TimeRexPayload::parse(body).inspect_err(|e| {
            tracing::error!(error = %e, body = %String::from_utf8_lossy(body), "Rejected TimeRex webhook");
        })?;

        match payload {
            TimeRexPayload::Booking {
                webhook_type,
                details,
            } => {
                let token = CorrelationToken::generate();
                let record = BookingRecord::new(details.schedule_time, details.meeting_url);
                self.store.insert(token, record.clone()).await?;

                tracing::info!(
                    token = %token,
                    webhook_type = webhook_type.as_str(),
                    schedule_time = %record.schedule_time,
                    meeting_url = %record.meeting_url,
                    "Booking stored"
                );
                Ok(BookingOutcome::Stored { token, record })
            }
            TimeRexPayload::LineEvents { count } => {
                tracing::info!(events = count, "LINE-shaped body on TimeRex endpoint acknowledged");
                Ok(BookingOutcome::Acknowledged { events: count })
            }
        }
    }

    /// Handle a LINE webhook body.
    ///
    /// Only `follow` events matter. A follow event with no token aborts the
    /// whole batch with [`RelayError::MissingSessionToken`]; delivery failures
    /// are logged and counted, never returned.
    pub async fn receive_line_events(
        &self,
        body: &[u8],
        token: Option<CorrelationToken>,
    ) -> Result<FollowReport> {
        let webhook = LineWebhook::parse(body).inspect_err(|e| {
            tracing::error!(error = %e, "Rejected LINE webhook");
        })?;

        tracing::debug!(
            destination = ?webhook.destination,
            events = webhook.events.len(),
            "LINE webhook received"
        );

        let mut report = FollowReport::default();

        for event in webhook.follow_events() {
            report.follow_events += 1;

            let Some(user_id) = event.user_id() else {
                tracing::warn!("Follow event without source.userId, skipping");
                report.skipped += 1;
                continue;
            };

            tracing::info!(user_id = %user_id, token = ?token.map(|t| t.to_string()), "LINE follow event");

            let Some(token) = token else {
                tracing::error!(user_id = %user_id, "Follow event without session token");
                return Err(RelayError::MissingSessionToken);
            };

            let Some(record) = self.store.lookup_and_validate(&token).await? else {
                tracing::warn!(token = %token, "No pending booking for session token");
                report.not_found += 1;
                continue;
            };

            match self.notifier.notify(user_id, &record).await {
                Ok(()) => {
                    report.notified += 1;
                    if self.consume_on_delivery {
                        self.store.delete(&token).await?;
                    }
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Failed to push booking confirmation");
                    report.delivery_failures += 1;
                }
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for BookingRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingRelay")
            .field("notifier", &self.notifier)
            .field("consume_on_delivery", &self.consume_on_delivery)
            .finish_non_exhaustive()
    }
}
