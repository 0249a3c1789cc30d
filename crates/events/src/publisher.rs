//! Sync-event publisher.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use volley_core::keys;
use volley_core::sync_event::SyncEvent;
use volley_core::types::Timestamp;
use volley_store::CoordinationStore;

use crate::config::FanoutConfig;
use crate::error::FanoutError;

/// Appends change events to their owner's current minute bucket.
///
/// Best-effort by design: a publish is a single append plus (for a fresh
/// bucket) one expiry command, with no acknowledgement of fanout and no
/// retry. Callers that need a durable record keep one elsewhere.
pub struct EventPublisher {
    store: Arc<dyn CoordinationStore>,
    retention_minutes: u32,
}

impl EventPublisher {
    pub fn new(store: Arc<dyn CoordinationStore>, config: &FanoutConfig) -> Self {
        Self {
            store,
            retention_minutes: config.retention_minutes,
        }
    }

    /// Publish an event into the bucket for the current minute.
    pub async fn publish(&self, event: &SyncEvent) -> Result<(), FanoutError> {
        self.publish_at(event, Utc::now()).await
    }

    /// Publish an event into the bucket for an explicit instant.
    ///
    /// Prefer [`publish`](Self::publish), which stamps the current time;
    /// this variant exists for callers that already hold the instant the
    /// mutation happened at.
    pub async fn publish_at(&self, event: &SyncEvent, at: Timestamp) -> Result<(), FanoutError> {
        let bucket = keys::event_bucket_key(
            &event.owner_typename,
            &event.owner_id,
            keys::epoch_minute(at),
        );

        self.store.list_push(&bucket, &event.encode()?).await?;

        // Only the first append fixes the countdown; a hot bucket must not
        // have its expiry pushed out by later appends.
        let fixed = self
            .store
            .expire_if_unset(
                &bucket,
                Duration::from_secs(u64::from(self.retention_minutes) * 60),
            )
            .await?;
        if fixed {
            tracing::debug!(bucket = %bucket, retention_minutes = self.retention_minutes, "Opened new event bucket");
        }

        Ok(())
    }
}
