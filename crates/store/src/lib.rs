//! Shared coordination store boundary.
//!
//! Every cross-process interaction in the orchestration core — the run
//! registry, the durable execution history, the minute-bucketed event log,
//! and worker dispatch — goes through the [`CoordinationStore`] trait
//! defined here. Components receive an explicitly constructed
//! `Arc<dyn CoordinationStore>` handle; there is no process-wide singleton.
//!
//! Two implementations ship:
//!
//! - [`RedisStore`] — the production backend, built on a managed
//!   auto-reconnecting Redis connection.
//! - [`MemoryStore`] — an in-process backend for tests and single-process
//!   deployments, with the same pub/sub and expiry semantics.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

pub mod config;
pub mod error;
pub mod memory;
pub mod redis;

pub use self::config::StoreConfig;
pub use self::error::StoreError;
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// A live pub/sub subscription to a single channel.
///
/// Delivery is at-most-once per currently-connected subscriber: messages
/// published while nobody is subscribed are gone, and nothing is replayed
/// on (re)subscribe.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self { receiver }
    }

    /// Await the next message, or `None` once the channel is closed.
    pub async fn next_message(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

/// The primitive operations this core needs from the shared store.
///
/// Every method is a single round trip; no operation holds a lock in the
/// store across calls. Errors are transient infrastructure failures —
/// callers decide whether and how to retry.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Set one field of a hash, creating the hash if needed.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Read one field of a hash.
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Delete one field of a hash. Deleting an absent field is a no-op.
    async fn hash_del(&self, key: &str, field: &str) -> Result<(), StoreError>;

    /// Number of fields in a hash (zero for an absent key).
    async fn hash_len(&self, key: &str) -> Result<u64, StoreError>;

    /// All `(field, value)` pairs of a hash.
    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Add a member to a set.
    async fn set_add(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// Remove a member from a set. Removing an absent member is a no-op.
    async fn set_remove(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// All members of a set.
    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Append a value to the tail of a list, creating the list if needed.
    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read several whole lists in one round trip.
    ///
    /// The result has one entry per requested key, in request order; absent
    /// or expired keys resolve to an empty list.
    async fn list_get_many(&self, keys: &[String]) -> Result<Vec<Vec<String>>, StoreError>;

    /// Set a key's time-to-live only if it has none yet.
    ///
    /// Returns `true` when this call fixed the expiry, `false` when the key
    /// already had one (or does not exist). The first writer wins; later
    /// calls never push the deadline out.
    async fn expire_if_unset(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Remaining time-to-live of a key, or `None` when the key does not
    /// exist or has no expiry.
    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, StoreError>;

    /// Publish a message to a channel. Fire-and-forget: delivery to
    /// subscribers is at-most-once and never acknowledged.
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), StoreError>;

    /// Subscribe to a channel, receiving messages published from now on.
    async fn subscribe(&self, channel: &str) -> Result<Subscription, StoreError>;
}
