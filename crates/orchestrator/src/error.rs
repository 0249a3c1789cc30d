use volley_core::error::CoreError;
use volley_store::StoreError;

/// Error surface of the orchestration layer.
///
/// `AdmissionDenied` and `Unauthorized` are terminal rejections, surfaced
/// to the end caller verbatim and never retried. `Store` errors are
/// transient; the caller owns the retry policy.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The workspace cannot admit another job right now (out of credits,
    /// or at its plan's concurrent-run ceiling).
    #[error("Admission denied: {0}")]
    AdmissionDenied(String),

    /// The acting user is missing or not a member of the target scope.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A domain-level error (validation, malformed record).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The shared store was unreachable or a command failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
