//! Well-known store key and channel names.
//!
//! These are the persisted layout shared with the execution workers and any
//! other process reading the coordination store. Changing any of them is a
//! wire-format break.

use chrono::{DateTime, Utc};

use crate::scope::Scope;

/// Pub/sub channel carrying the id of every newly admitted job.
pub const DISPATCH_CHANNEL: &str = "orchestrator:execution";

/// Durable set of every job id ever admitted, independent of registry
/// lifecycle.
pub const HISTORY_SET_KEY: &str = "orchestrator:executionHistory";

/// Hash field under which a job record is stored (hash key = job id).
pub const JOB_RECORD_FIELD: &str = "job";

/// Registry partition key for a workspace scope.
///
/// Layout: `workspace:{USER|TEAM}:{variantTargetId}`.
pub fn workspace_key(scope: &Scope) -> String {
    format!(
        "workspace:{}:{}",
        scope.variant.as_str(),
        scope.variant_target_id
    )
}

/// The whole minute an instant falls into, counted from the Unix epoch.
pub fn epoch_minute(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(60)
}

/// Key of the one-minute event bucket for an owner at a given minute.
///
/// Layout: `{ownerTypename}_{ownerId}_{epochMinute}`.
pub fn event_bucket_key(owner_typename: &str, owner_id: &str, minute: i64) -> String {
    format!("{owner_typename}_{owner_id}_{minute}")
}
