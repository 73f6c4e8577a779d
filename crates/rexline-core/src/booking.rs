// Booking record and correlation token
//
// A BookingRecord is the minimal meeting detail set cached until the visitor
// opts in on LINE. The CorrelationToken links the two webhooks together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stored when TimeRex sends no `local_start_datetime`
pub const UNKNOWN_SCHEDULE: &str = "unknown";

/// Stored when the event carries no recognizable meeting URL
pub const NO_URL: &str = "no URL";

/// Stored when the provider is Zoom but `zoom_meeting.join_url` is absent
pub const NO_ZOOM_URL: &str = "no Zoom URL";

/// Opaque token correlating a booking with a later follow event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(Uuid);

impl CorrelationToken {
    /// Mint a fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for CorrelationToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Pending booking details, owned by the correlation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Human-readable start time as sent by TimeRex, or [`UNKNOWN_SCHEDULE`]
    pub schedule_time: String,
    /// Online meeting URL, or one of the `NO_*` sentinels
    pub meeting_url: String,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Create a record stamped with the current time
    pub fn new(schedule_time: impl Into<String>, meeting_url: impl Into<String>) -> Self {
        Self::with_created_at(schedule_time, meeting_url, Utc::now())
    }

    pub fn with_created_at(
        schedule_time: impl Into<String>,
        meeting_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            schedule_time: schedule_time.into(),
            meeting_url: meeting_url.into(),
            created_at,
        }
    }

    /// Age of the record relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }

    /// A record is valid while its age is strictly below the TTL
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.age(now) < ttl
    }
}
