//! External collaborator gates.
//!
//! Quota and membership decisions live outside this core; these traits are
//! the narrow interfaces through which it consults them. The surrounding
//! application implements them against its billing and membership systems;
//! tests supply stubs.

use async_trait::async_trait;

use volley_core::scope::Scope;

use crate::error::OrchestratorError;

/// Plan-derived admission limits for a workspace.
#[derive(Debug, Clone, Copy)]
pub struct PlanLimits {
    /// Maximum number of jobs the workspace may have running at once.
    pub max_concurrent_jobs: u64,
}

/// Answers whether a workspace can pay for, and is allowed to start,
/// another job. Consulted synchronously at admission.
#[async_trait]
pub trait QuotaGate: Send + Sync {
    async fn has_sufficient_credits(&self, scope: &Scope) -> bool;

    async fn plan_limits(&self, scope: &Scope) -> PlanLimits;
}

/// Answers whether an actor belongs to (or administers) a scope.
/// Consulted before any checked registry read and before history pruning.
#[async_trait]
pub trait MembershipGate: Send + Sync {
    async fn is_member(&self, actor_id: &str, scope: &Scope) -> bool;

    async fn is_owner_or_admin(&self, actor_id: &str, scope: &Scope) -> bool;
}

pub(crate) async fn ensure_member(
    gate: &dyn MembershipGate,
    actor_id: &str,
    scope: &Scope,
) -> Result<(), OrchestratorError> {
    if gate.is_member(actor_id, scope).await {
        Ok(())
    } else {
        Err(OrchestratorError::Unauthorized(format!(
            "user {actor_id} is not a member of this workspace"
        )))
    }
}

pub(crate) async fn ensure_owner_or_admin(
    gate: &dyn MembershipGate,
    actor_id: &str,
    scope: &Scope,
) -> Result<(), OrchestratorError> {
    if gate.is_owner_or_admin(actor_id, scope).await {
        Ok(())
    } else {
        Err(OrchestratorError::Unauthorized(format!(
            "user {actor_id} is not an owner or admin of this workspace"
        )))
    }
}
