//! Worker-reported status transitions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use volley_core::job::{JobStatus, RunningTestInfo};
use volley_core::keys;
use volley_core::scope::Scope;
use volley_store::CoordinationStore;

use crate::error::OrchestratorError;

/// Applies status transitions to the live registry.
///
/// A terminal status deletes the registry entry; anything else rewrites the
/// whole record with the new status (the store has no partial update for
/// nested records). Transitions are not validated against the state
/// machine: the worker owns ordering, and duplicate or out-of-order reports
/// must not fail here.
///
/// Updates for the same job id are serialized through an in-process keyed
/// lock so a stale read never clobbers a newer write from the same process.
/// Writers in other processes remain last-write-wins.
pub struct StatusMutator {
    store: Arc<dyn CoordinationStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl StatusMutator {
    pub fn new(store: Arc<dyn CoordinationStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Apply a worker-reported status to a job in the given scope.
    pub async fn apply_status(
        &self,
        scope: &Scope,
        job_id: &str,
        status: JobStatus,
    ) -> Result<(), OrchestratorError> {
        let workspace = keys::workspace_key(scope);
        let lock = self.job_lock(job_id).await;
        let guard = lock.lock().await;

        if status.is_terminal() {
            // Deleting an absent field is a no-op, so repeated terminal
            // reports are harmless.
            self.store.hash_del(&workspace, job_id).await?;
            drop(guard);
            self.locks.lock().await.remove(job_id);
            tracing::info!(
                job_id,
                workspace = %workspace,
                status = status.as_str(),
                "Job reached terminal status; registry entry removed"
            );
            return Ok(());
        }

        let Some(raw) = self.store.hash_get(&workspace, job_id).await? else {
            // Benign race: the record is not there yet, or the job already
            // completed and was removed. Never fabricate one.
            tracing::debug!(
                job_id,
                workspace = %workspace,
                status = status.as_str(),
                "Status update for a job with no registry entry; ignoring"
            );
            return Ok(());
        };

        let mut info = match RunningTestInfo::decode(&raw) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(
                    job_id,
                    workspace = %workspace,
                    error = %e,
                    "Registry entry is malformed; ignoring status update"
                );
                return Ok(());
            }
        };

        info.status = status;
        self.store
            .hash_set(&workspace, job_id, &info.encode()?)
            .await?;
        Ok(())
    }

    async fn job_lock(&self, job_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(job_id.to_string())
            .or_default()
            .clone()
    }
}
