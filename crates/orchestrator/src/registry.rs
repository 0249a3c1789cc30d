//! Read side of the live run registry.

use std::sync::Arc;

use volley_core::job::RunningTestInfo;
use volley_core::keys;
use volley_core::scope::Scope;
use volley_store::CoordinationStore;

use crate::error::OrchestratorError;
use crate::gates::{ensure_member, MembershipGate};

/// Pure reads over the per-workspace registry hash.
pub struct RunRegistry {
    store: Arc<dyn CoordinationStore>,
}

impl RunRegistry {
    pub fn new(store: Arc<dyn CoordinationStore>) -> Self {
        Self { store }
    }

    /// Every live entry in the workspace.
    ///
    /// A malformed entry is logged and skipped; one corrupt record must not
    /// hide the rest of the workspace's listing.
    pub async fn list(&self, scope: &Scope) -> Result<Vec<RunningTestInfo>, OrchestratorError> {
        let workspace = keys::workspace_key(scope);
        let fields = self.store.hash_get_all(&workspace).await?;

        let mut entries = Vec::with_capacity(fields.len());
        for (job_id, raw) in fields {
            match RunningTestInfo::decode(&raw) {
                Ok(info) => entries.push(info),
                Err(e) => {
                    tracing::warn!(
                        workspace = %workspace,
                        job_id = %job_id,
                        error = %e,
                        "Skipping malformed registry record"
                    );
                }
            }
        }
        Ok(entries)
    }

    /// Number of live entries, served by the store's native field count —
    /// no values are fetched or deserialized.
    pub async fn count(&self, scope: &Scope) -> Result<u64, OrchestratorError> {
        Ok(self.store.hash_len(&keys::workspace_key(scope)).await?)
    }

    /// [`list`](Self::list), gated on workspace membership.
    pub async fn list_checked(
        &self,
        actor_id: &str,
        scope: &Scope,
        membership: &dyn MembershipGate,
    ) -> Result<Vec<RunningTestInfo>, OrchestratorError> {
        ensure_member(membership, actor_id, scope).await?;
        self.list(scope).await
    }

    /// [`count`](Self::count), gated on workspace membership.
    pub async fn count_checked(
        &self,
        actor_id: &str,
        scope: &Scope,
        membership: &dyn MembershipGate,
    ) -> Result<u64, OrchestratorError> {
        ensure_member(membership, actor_id, scope).await?;
        self.count(scope).await
    }
}
