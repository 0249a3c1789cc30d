/// Job identifiers are opaque UUID strings generated at admission.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
