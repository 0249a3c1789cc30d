#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A value read from the shared store failed to deserialize.
    ///
    /// Listing paths treat this as "record absent" after logging it; only
    /// callers that asked for the record itself see the error.
    #[error("Malformed {record} record: {detail}")]
    MalformedRecord {
        record: &'static str,
        detail: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
