//! End-to-end fanout tests: publisher and window reader against the
//! in-memory coordination store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use volley_core::keys;
use volley_core::types::Timestamp;
use volley_events::{EventPublisher, EventWindow, FanoutConfig, SyncEvent, SyncEventKind};
use volley_store::{CoordinationStore, MemoryStore};

fn at_minute(minute: i64, second: i64) -> Timestamp {
    Utc.timestamp_opt(minute * 60 + second, 0).unwrap()
}

fn event(owner_id: &str, object_id: &str) -> SyncEvent {
    SyncEvent::new(
        SyncEventKind::Update,
        "User",
        owner_id,
        "Collection",
        object_id,
    )
}

fn fanout(
    store: &Arc<MemoryStore>,
    retention_minutes: u32,
) -> (EventPublisher, EventWindow) {
    let config = FanoutConfig::with_retention_minutes(retention_minutes);
    let store: Arc<dyn CoordinationStore> = store.clone();
    (
        EventPublisher::new(store.clone(), &config),
        EventWindow::new(store, &config),
    )
}

/// Three events at minute M and one at minute M-1: a two-minute window
/// returns all four, a one-minute window only the three from M.
#[tokio::test]
async fn window_covers_exactly_the_trailing_buckets() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, two_minute_window) = fanout(&store, 2);
    let (_, one_minute_window) = fanout(&store, 1);

    let m = 1_000;
    for object_id in ["a", "b", "c"] {
        publisher
            .publish_at(&event("u1", object_id), at_minute(m, 10))
            .await
            .unwrap();
    }
    publisher
        .publish_at(&event("u1", "older"), at_minute(m - 1, 50))
        .await
        .unwrap();

    let read_at = at_minute(m, 30);

    let both = two_minute_window.recent_at("User", "u1", read_at).await.unwrap();
    assert_eq!(both.len(), 4);

    let current_only = one_minute_window.recent_at("User", "u1", read_at).await.unwrap();
    assert_eq!(current_only.len(), 3);
    assert!(current_only.iter().all(|e| e.object_id != "older"));
}

/// An event published anywhere inside the guaranteed portion of the window
/// is still visible: here, read `(retention - 1)` minutes after publish.
#[tokio::test]
async fn window_guarantees_at_least_retention_minus_one_minutes() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, window) = fanout(&store, 3);

    let m = 2_000;
    publisher
        .publish_at(&event("u1", "x"), at_minute(m, 59))
        .await
        .unwrap();

    // Latest read instant still inside the guarantee: t1 - t0 < (3-1)*60.
    let read_at = at_minute(m + 2, 58);
    let events = window.recent_at("User", "u1", read_at).await.unwrap();
    assert_eq!(events.len(), 1);
}

/// Once the bucket falls out of the trailing window it is no longer read,
/// even if the store has not expired it yet.
#[tokio::test]
async fn window_drops_buckets_past_retention() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, window) = fanout(&store, 2);

    let m = 3_000;
    publisher
        .publish_at(&event("u1", "x"), at_minute(m, 0))
        .await
        .unwrap();

    let events = window
        .recent_at("User", "u1", at_minute(m + 2, 0))
        .await
        .unwrap();
    assert!(events.is_empty());
}

/// Appending a second event to a bucket must not extend the time-to-live
/// the first append fixed.
#[tokio::test]
async fn second_append_does_not_extend_bucket_expiry() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, _) = fanout(&store, 2);

    let m = 4_000;
    let publish_at = at_minute(m, 5);
    publisher
        .publish_at(&event("u1", "first"), publish_at)
        .await
        .unwrap();

    let bucket = keys::event_bucket_key("User", "u1", m);
    let ttl_after_first = store.time_to_live(&bucket).await.unwrap().unwrap();

    publisher
        .publish_at(&event("u1", "second"), publish_at)
        .await
        .unwrap();
    let ttl_after_second = store.time_to_live(&bucket).await.unwrap().unwrap();

    assert!(ttl_after_second <= ttl_after_first);
    assert!(ttl_after_first <= Duration::from_secs(2 * 60));
}

/// Events are partitioned by owner: another owner's window never sees them.
#[tokio::test]
async fn windows_are_partitioned_by_owner() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, window) = fanout(&store, 2);

    let m = 5_000;
    publisher
        .publish_at(&event("u1", "mine"), at_minute(m, 0))
        .await
        .unwrap();

    let other_owner = window
        .recent_at("User", "u2", at_minute(m, 10))
        .await
        .unwrap();
    assert!(other_owner.is_empty());

    let other_typename = window
        .recent_at("Team", "u1", at_minute(m, 10))
        .await
        .unwrap();
    assert!(other_typename.is_empty());
}

/// One corrupt entry in a bucket is skipped; the rest of the window is
/// still returned.
#[tokio::test]
async fn malformed_bucket_entries_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, window) = fanout(&store, 2);

    let m = 6_000;
    publisher
        .publish_at(&event("u1", "good"), at_minute(m, 0))
        .await
        .unwrap();

    let bucket = keys::event_bucket_key("User", "u1", m);
    store.list_push(&bucket, "{definitely not json").await.unwrap();

    let events = window
        .recent_at("User", "u1", at_minute(m, 30))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].object_id, "good");
}

/// Buckets are returned newest first; append order holds within a bucket.
#[tokio::test]
async fn window_orders_newest_bucket_first() {
    let store = Arc::new(MemoryStore::new());
    let (publisher, window) = fanout(&store, 2);

    let m = 7_000;
    publisher
        .publish_at(&event("u1", "old-1"), at_minute(m - 1, 0))
        .await
        .unwrap();
    publisher
        .publish_at(&event("u1", "new-1"), at_minute(m, 0))
        .await
        .unwrap();
    publisher
        .publish_at(&event("u1", "new-2"), at_minute(m, 1))
        .await
        .unwrap();

    let events = window
        .recent_at("User", "u1", at_minute(m, 30))
        .await
        .unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.object_id.as_str()).collect();
    assert_eq!(ids, vec!["new-1", "new-2", "old-1"]);
}
