//! In-process coordination store.
//!
//! [`MemoryStore`] implements the full [`CoordinationStore`] contract
//! against process-local state: hashes, sets, and lists in maps, per-key
//! expiry enforced lazily on access, and pub/sub over tokio channels with
//! the same at-most-once, no-replay semantics as the production backend.
//!
//! Used by the test suites and by single-process deployments that have no
//! external store.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::StoreError;
use crate::{CoordinationStore, Subscription};

/// In-memory implementation of [`CoordinationStore`].
#[derive(Default)]
pub struct MemoryStore {
    // The data mutex is only ever held for synchronous map operations,
    // never across an await.
    data: Mutex<Data>,
    channels: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<String>>>>,
}

#[derive(Default)]
struct Data {
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, HashSet<String>>,
    lists: HashMap<String, Vec<String>>,
    deadlines: HashMap<String, Instant>,
}

impl Data {
    /// Drop the key entirely if its deadline has passed.
    fn purge_expired(&mut self, key: &str) {
        let expired = self
            .deadlines
            .get(key)
            .is_some_and(|deadline| *deadline <= Instant::now());
        if expired {
            self.deadlines.remove(key);
            self.hashes.remove(key);
            self.sets.remove(key);
            self.lists.remove(key);
        }
    }

    fn key_exists(&self, key: &str) -> bool {
        self.hashes.contains_key(key) || self.sets.contains_key(key) || self.lists.contains_key(key)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_data(&self) -> std::sync::MutexGuard<'_, Data> {
        // A poisoned mutex means a panic mid-map-operation; propagating the
        // panic is the only sane option for an in-process test store.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        data.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        Ok(data
            .hashes
            .get(key)
            .and_then(|fields| fields.get(field))
            .cloned())
    }

    async fn hash_del(&self, key: &str, field: &str) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        if let Some(fields) = data.hashes.get_mut(key) {
            fields.remove(field);
            if fields.is_empty() {
                data.hashes.remove(key);
            }
        }
        Ok(())
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        Ok(data.hashes.get(key).map_or(0, |fields| fields.len() as u64))
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        Ok(data
            .hashes
            .get(key)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        data.sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        if let Some(members) = data.sets.get_mut(key) {
            members.remove(member);
            if members.is_empty() {
                data.sets.remove(key);
            }
        }
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        Ok(data
            .sets
            .get(key)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        data.lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn list_get_many(&self, keys: &[String]) -> Result<Vec<Vec<String>>, StoreError> {
        let mut data = self.lock_data();
        Ok(keys
            .iter()
            .map(|key| {
                data.purge_expired(key);
                data.lists.get(key).cloned().unwrap_or_default()
            })
            .collect())
    }

    async fn expire_if_unset(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        if !data.key_exists(key) || data.deadlines.contains_key(key) {
            return Ok(false);
        }
        data.deadlines.insert(key.to_string(), Instant::now() + ttl);
        Ok(true)
    }

    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let mut data = self.lock_data();
        data.purge_expired(key);
        Ok(data
            .deadlines
            .get(key)
            .map(|deadline| deadline.saturating_duration_since(Instant::now())))
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), StoreError> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(senders) = channels.get_mut(channel) {
            // Dropped receivers fall out of the list here; nothing is
            // buffered for them.
            senders.retain(|sender| sender.send(payload.to_string()).is_ok());
            if senders.is_empty() {
                channels.remove(channel);
            }
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(channel.to_string())
            .or_default()
            .push(sender);
        Ok(Subscription::new(receiver))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
