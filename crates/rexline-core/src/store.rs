// Correlation store trait
//
// Maps a correlation token to the booking waiting for the visitor's follow
// event. The in-memory implementation lives in `memory`; anything else that
// can honor the TTL rule can be plugged in behind the same trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::booking::{BookingRecord, CorrelationToken};
use crate::error::Result;

/// How long a booking stays claimable after it was received
pub const DEFAULT_BOOKING_TTL: Duration = Duration::from_secs(60 * 60);

/// Trait for parking bookings until the matching follow event arrives
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Store a record under a freshly minted token
    async fn insert(&self, token: CorrelationToken, record: BookingRecord) -> Result<()>;

    /// Return the record if it is younger than the TTL.
    ///
    /// Expired records are removed as a side effect and reported as `None`,
    /// so a second lookup of the same token is also `None`.
    async fn lookup_and_validate(&self, token: &CorrelationToken) -> Result<Option<BookingRecord>>;

    /// Remove a record; returns whether one was present
    async fn delete(&self, token: &CorrelationToken) -> Result<bool>;

    /// Number of records currently held, expired ones included
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
