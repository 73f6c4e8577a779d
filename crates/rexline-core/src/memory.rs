// In-memory implementations
//
// InMemoryBookingStore is the production store (a single process, no
// persistence). The push clients here never touch the network and are used
// by tests and local dry runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::booking::{BookingRecord, CorrelationToken};
use crate::error::{RelayError, Result};
use crate::notifier::PushClient;
use crate::store::{BookingStore, DEFAULT_BOOKING_TTL};

// ============================================================================
// InMemoryBookingStore - Correlation store backed by a HashMap
// ============================================================================

/// In-memory correlation store
///
/// Stores booking records in a HashMap keyed by correlation token. Expired
/// records are only reclaimed when their token is looked up again.
#[derive(Debug, Clone)]
pub struct InMemoryBookingStore {
    records: Arc<RwLock<HashMap<CorrelationToken, BookingRecord>>>,
    ttl: chrono::Duration,
}

impl InMemoryBookingStore {
    /// Create a store with the default one hour TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_BOOKING_TTL)
    }

    /// Create a store with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Read a record without the TTL check (useful for testing)
    pub async fn peek(&self, token: &CorrelationToken) -> Option<BookingRecord> {
        self.records.read().await.get(token).cloned()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, token: CorrelationToken, record: BookingRecord) -> Result<()> {
        self.records.write().await.insert(token, record);
        Ok(())
    }

    async fn lookup_and_validate(&self, token: &CorrelationToken) -> Result<Option<BookingRecord>> {
        // Check and evict under one write lock so a concurrent insert can't interleave
        let mut records = self.records.write().await;

        let Some(record) = records.get(token) else {
            return Ok(None);
        };

        if record.is_valid_at(Utc::now(), self.ttl) {
            return Ok(Some(record.clone()));
        }

        tracing::info!(token = %token, created_at = %record.created_at, "Booking expired, evicting");
        records.remove(token);
        Ok(None)
    }

    async fn delete(&self, token: &CorrelationToken) -> Result<bool> {
        Ok(self.records.write().await.remove(token).is_some())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

// ============================================================================
// RecordingPushClient - Captures pushes instead of sending them
// ============================================================================

/// A message captured by [`RecordingPushClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedMessage {
    pub to: String,
    pub text: String,
}

/// Push client that records every message
#[derive(Debug, Default, Clone)]
pub struct RecordingPushClient {
    pushed: Arc<RwLock<Vec<PushedMessage>>>,
}

impl RecordingPushClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages pushed so far, oldest first
    pub async fn pushed(&self) -> Vec<PushedMessage> {
        self.pushed.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.pushed.read().await.len()
    }
}

#[async_trait]
impl PushClient for RecordingPushClient {
    async fn push_text(&self, to: &str, text: &str) -> Result<()> {
        tracing::debug!(to = %to, "Recording push instead of sending");
        self.pushed.write().await.push(PushedMessage {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// FailingPushClient - Always fails
// ============================================================================

/// Push client that fails every call with the configured message
#[derive(Debug, Clone)]
pub struct FailingPushClient {
    message: String,
}

impl FailingPushClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl PushClient for FailingPushClient {
    async fn push_text(&self, _to: &str, _text: &str) -> Result<()> {
        Err(RelayError::delivery(self.message.clone()))
    }
}
