/// A failure talking to the shared coordination store.
///
/// Both variants are transient from the caller's point of view: the store
/// was unreachable or a command failed mid-flight. Callers own the retry
/// policy (typically exponential backoff); this crate never retries on its
/// own.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached, or the connection dropped mid-call.
    #[error("store unreachable: {0}")]
    Connection(String),

    /// The store rejected or failed a command.
    #[error("store command failed: {0}")]
    Command(String),
}
