//! Trailing-window event reader.

use std::sync::Arc;

use chrono::Utc;
use volley_core::keys;
use volley_core::sync_event::SyncEvent;
use volley_core::types::Timestamp;
use volley_store::CoordinationStore;

use crate::config::FanoutConfig;
use crate::error::FanoutError;

/// Reconstructs the recent event window for one owner.
///
/// A read fetches exactly `retention_minutes` bucket keys — the current
/// minute and the `retention_minutes - 1` before it — in a single batch
/// round trip. Because buckets are whole disjoint minutes, the result is an
/// approximation of "the last N minutes": events from at least `N - 1` full
/// minutes are guaranteed, events from the oldest partial minute may have
/// just expired. No grace bucket is added beyond the window.
pub struct EventWindow {
    store: Arc<dyn CoordinationStore>,
    retention_minutes: u32,
}

impl EventWindow {
    pub fn new(store: Arc<dyn CoordinationStore>, config: &FanoutConfig) -> Self {
        Self {
            store,
            retention_minutes: config.retention_minutes,
        }
    }

    /// All events for an owner in the trailing retention window.
    ///
    /// Events are returned newest bucket first; within a bucket they keep
    /// store append order. Missing or expired buckets contribute nothing;
    /// malformed entries are logged and skipped so one corrupt record never
    /// hides the rest of the window.
    pub async fn recent(
        &self,
        owner_typename: &str,
        owner_id: &str,
    ) -> Result<Vec<SyncEvent>, FanoutError> {
        self.recent_at(owner_typename, owner_id, Utc::now()).await
    }

    /// [`recent`](Self::recent) with an explicit "now".
    pub async fn recent_at(
        &self,
        owner_typename: &str,
        owner_id: &str,
        now: Timestamp,
    ) -> Result<Vec<SyncEvent>, FanoutError> {
        let current = keys::epoch_minute(now);
        let bucket_keys: Vec<String> = (0..i64::from(self.retention_minutes))
            .map(|offset| keys::event_bucket_key(owner_typename, owner_id, current - offset))
            .collect();

        let buckets = self.store.list_get_many(&bucket_keys).await?;

        let mut events = Vec::new();
        for (bucket_key, bucket) in bucket_keys.iter().zip(buckets) {
            for raw in bucket {
                match SyncEvent::decode(&raw) {
                    Ok(event) => events.push(event),
                    Err(e) => {
                        tracing::warn!(bucket = %bucket_key, error = %e, "Skipping malformed sync event");
                    }
                }
            }
        }
        Ok(events)
    }
}
