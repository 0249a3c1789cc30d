use volley_core::error::CoreError;
use volley_store::StoreError;

/// Failure publishing or reading sync events.
#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    /// The shared store was unreachable or a command failed; retryable.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record could not be encoded. Malformed records read back from a
    /// bucket are logged and skipped, never surfaced here.
    #[error(transparent)]
    Core(#[from] CoreError),
}
