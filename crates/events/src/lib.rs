//! Minute-bucketed change-event fanout.
//!
//! This crate implements the time-windowed event log on top of the shared
//! coordination store:
//!
//! - [`EventPublisher`] — appends a [`SyncEvent`] to the current minute's
//!   bucket for its owner and fixes the bucket's expiry on first write.
//! - [`EventWindow`] — reconstructs the trailing retention window by
//!   batch-reading a fixed number of recent buckets.
//! - [`FanoutConfig`] — retention window configuration.
//!
//! Publishing is fire-and-forget: there is no acknowledgement and no retry.
//! Readers poll; nothing is pushed to them.

pub mod config;
pub mod error;
pub mod publisher;
pub mod window;

pub use config::FanoutConfig;
pub use error::FanoutError;
pub use publisher::EventPublisher;
pub use window::EventWindow;

pub use volley_core::sync_event::{SyncEvent, SyncEventKind};
