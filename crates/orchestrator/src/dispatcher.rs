//! Job admission and dispatch.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use volley_core::job::{self, Job, JobStatus, RunningTestInfo};
use volley_core::keys;
use volley_core::scope::Scope;
use volley_store::CoordinationStore;

use crate::error::OrchestratorError;
use crate::gates::{ensure_owner_or_admin, MembershipGate, QuotaGate};

/// A caller's request to run a job.
///
/// `actor_id` comes from the authentication context — an unauthenticated
/// call must be rejected before it reaches this layer. `source` and
/// `options` are opaque and forwarded to the worker untouched.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub actor_id: String,
    pub scope: Scope,
    pub source: String,
    pub source_name: String,
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Admits new jobs and makes them discoverable by workers.
///
/// Admission consults the quota gate (plan ceiling, then credits); an
/// admitted job is written to the store — job record, live-registry entry,
/// durable history append — and announced on the dispatch channel. Channel
/// delivery is at-most-once to currently-connected subscribers and is never
/// replayed; the history set is the durable record of every admission.
pub struct JobDispatcher {
    store: Arc<dyn CoordinationStore>,
    quota: Arc<dyn QuotaGate>,
}

impl JobDispatcher {
    pub fn new(store: Arc<dyn CoordinationStore>, quota: Arc<dyn QuotaGate>) -> Self {
        Self { store, quota }
    }

    /// Admit and dispatch a job.
    ///
    /// On success the job exists in the live registry with status
    /// `PENDING`, its id is in the execution history, and one dispatch
    /// notification has been published. On `AdmissionDenied` nothing was
    /// written.
    pub async fn submit(&self, request: SubmitRequest) -> Result<Job, OrchestratorError> {
        job::validate_submission(&request.source, &request.source_name)?;

        let workspace = keys::workspace_key(&request.scope);

        let limits = self.quota.plan_limits(&request.scope).await;
        let running = self.store.hash_len(&workspace).await?;
        if running >= limits.max_concurrent_jobs {
            return Err(OrchestratorError::AdmissionDenied(format!(
                "workspace already has {running} running jobs (plan allows {})",
                limits.max_concurrent_jobs
            )));
        }

        if !self.quota.has_sufficient_credits(&request.scope).await {
            return Err(OrchestratorError::AdmissionDenied(
                "no credits remaining for this workspace".to_string(),
            ));
        }

        let job = Job {
            id: Uuid::new_v4().to_string(),
            source: request.source,
            source_name: request.source_name,
            status: JobStatus::Pending,
            options: request.options,
            scope: request.scope,
            created_by_user_id: request.actor_id,
            created_at: Utc::now(),
        };
        let info = RunningTestInfo::from_job(&job);

        // Record and registry entry go in before the announcement so a
        // subscriber can always resolve the id it receives.
        self.store
            .hash_set(&job.id, keys::JOB_RECORD_FIELD, &job.encode()?)
            .await?;
        self.store
            .hash_set(&workspace, &job.id, &info.encode()?)
            .await?;

        // The history append is unconditional: channel delivery is
        // best-effort, the history set is the audit trail.
        self.store.set_add(keys::HISTORY_SET_KEY, &job.id).await?;
        self.store.publish(keys::DISPATCH_CHANNEL, &job.id).await?;

        tracing::info!(
            job_id = %job.id,
            workspace = %workspace,
            source_name = %job.source_name,
            "Job admitted and dispatched"
        );

        Ok(job)
    }

    /// Remove a job id from the durable execution history.
    ///
    /// The history set otherwise keeps ids forever; this is the pruning
    /// hook, restricted to owners and admins of the scope.
    pub async fn remove_from_history(
        &self,
        actor_id: &str,
        scope: &Scope,
        membership: &dyn MembershipGate,
        job_id: &str,
    ) -> Result<(), OrchestratorError> {
        ensure_owner_or_admin(membership, actor_id, scope).await?;

        self.store.set_remove(keys::HISTORY_SET_KEY, job_id).await?;
        tracing::info!(job_id, actor_id, "Job id pruned from execution history");
        Ok(())
    }
}
