//! Redis-backed coordination store.
//!
//! [`RedisStore`] maps the [`CoordinationStore`] contract one-to-one onto
//! Redis commands over a managed, auto-reconnecting multiplexed connection.
//! Pub/sub runs on a dedicated connection per subscription, bridged into a
//! tokio channel by a background task.
//!
//! `expire_if_unset` uses `EXPIRE ... NX` and therefore requires a Redis
//! 7.0+ server.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, RedisError};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::{CoordinationStore, Subscription};

/// Production [`CoordinationStore`] backed by Redis.
pub struct RedisStore {
    client: ::redis::Client,
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open the client and establish the managed command connection.
    ///
    /// The returned handle is cheap to share behind an `Arc`; the managed
    /// connection reconnects on its own after transient failures.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = ::redis::Client::open(config.url.as_str()).map_err(map_redis_err)?;

        let conn = tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            ConnectionManager::new(client.clone()),
        )
        .await
        .map_err(|_| {
            StoreError::Connection(format!(
                "timed out connecting to {} after {}s",
                config.url, config.connect_timeout_secs
            ))
        })?
        .map_err(map_redis_err)?;

        tracing::info!(url = %config.url, "Connected to coordination store");
        Ok(Self { client, conn })
    }
}

#[async_trait]
impl CoordinationStore for RedisStore {
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset(key, field, value).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.hget(key, field).await.map_err(map_redis_err)
    }

    async fn hash_del(&self, key: &str, field: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hdel(key, field).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        conn.hlen(key).await.map_err(map_redis_err)
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, StoreError> {
        let mut conn = self.conn.clone();
        conn.hgetall(key).await.map_err(map_redis_err)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(key, member).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.srem(key, member).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.smembers(key).await.map_err(map_redis_err)
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(key, value).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn list_get_many(&self, keys: &[String]) -> Result<Vec<Vec<String>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        // One pipelined round trip; absent keys come back as empty lists.
        let mut pipe = ::redis::pipe();
        for key in keys {
            pipe.lrange(key, 0, -1);
        }
        let mut conn = self.conn.clone();
        pipe.query_async(&mut conn).await.map_err(map_redis_err)
    }

    async fn expire_if_unset(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let set: i64 = ::redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(set == 1)
    }

    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let mut conn = self.conn.clone();
        let ttl: i64 = conn.ttl(key).await.map_err(map_redis_err)?;
        // -1 = no expiry, -2 = no such key.
        Ok((ttl >= 0).then(|| Duration::from_secs(ttl as u64)))
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.publish(channel, payload).await.map_err(map_redis_err)?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, StoreError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(map_redis_err)?;
        pubsub.subscribe(channel).await.map_err(map_redis_err)?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let channel = channel.to_string();

        // Bridge the pub/sub connection into a plain channel. The task ends
        // when the server connection drops or the subscriber is dropped.
        tokio::spawn(async move {
            let mut messages = pubsub.on_message();
            while let Some(message) = messages.next().await {
                let payload: String = match message.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(channel = %channel, error = %e, "Dropping undecodable pub/sub payload");
                        continue;
                    }
                };
                if sender.send(payload).is_err() {
                    break;
                }
            }
            tracing::debug!(channel = %channel, "Pub/sub bridge task finished");
        });

        Ok(Subscription::new(receiver))
    }
}

fn map_redis_err(err: RedisError) -> StoreError {
    if err.is_io_error() || err.is_timeout() || err.is_connection_refusal() || err.is_connection_dropped()
    {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Command(err.to_string())
    }
}
