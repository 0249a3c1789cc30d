//! Job records, the status state machine, and the live-registry entry.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scope::Scope;
use crate::types::{JobId, Timestamp};

/// Maximum length of a job's human-readable source label.
const MAX_SOURCE_NAME_LEN: usize = 128;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a job, as reported by the execution worker.
///
/// Expected progression: `Pending -> Assigned -> Loading -> Running ->
/// {Success, Failure} -> {CompletedSuccess, CompletedFailure}`. The
/// progression is not enforced here — ordering is the worker's
/// responsibility, and out-of-order or duplicate reports are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Assigned,
    Loading,
    Running,
    Failure,
    Success,
    CompletedSuccess,
    CompletedFailure,
}

impl JobStatus {
    /// The exact token used on the wire (`PENDING`, `COMPLETED_SUCCESS`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Assigned => "ASSIGNED",
            JobStatus::Loading => "LOADING",
            JobStatus::Running => "RUNNING",
            JobStatus::Failure => "FAILURE",
            JobStatus::Success => "SUCCESS",
            JobStatus::CompletedSuccess => "COMPLETED_SUCCESS",
            JobStatus::CompletedFailure => "COMPLETED_FAILURE",
        }
    }

    /// Terminal statuses remove the job from the live registry.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::CompletedSuccess | JobStatus::CompletedFailure
        )
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// A job record as written at admission and read back by the worker.
///
/// `source` and `options` are opaque to this core — they are forwarded to
/// the worker untouched. The owning `scope` travels with the record so the
/// worker can derive the registry partition key for its status updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub source: String,
    pub source_name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
    pub scope: Scope,
    pub created_by_user_id: String,
    pub created_at: Timestamp,
}

impl Job {
    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedRecord {
            record: "Job",
            detail: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// RunningTestInfo
// ---------------------------------------------------------------------------

/// The live-registry value kept per running job.
///
/// Exists in the registry iff the job is non-terminal; a terminal status
/// report deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTestInfo {
    pub job_id: JobId,
    pub source_name: String,
    pub created_by_user_id: String,
    pub created_at: Timestamp,
    pub status: JobStatus,
}

impl RunningTestInfo {
    /// Build the initial registry entry for a freshly admitted job.
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            source_name: job.source_name.clone(),
            created_by_user_id: job.created_by_user_id.clone(),
            created_at: job.created_at,
            status: job.status,
        }
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedRecord {
            record: "RunningTestInfo",
            detail: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a submission's caller-supplied fields.
///
/// Rules:
/// - `source` must not be empty.
/// - `source_name` must not be empty and must not exceed
///   `MAX_SOURCE_NAME_LEN` characters.
pub fn validate_submission(source: &str, source_name: &str) -> Result<(), CoreError> {
    if source.is_empty() {
        return Err(CoreError::Validation(
            "Job source must not be empty".to_string(),
        ));
    }
    if source_name.is_empty() {
        return Err(CoreError::Validation(
            "Source name must not be empty".to_string(),
        ));
    }
    if source_name.len() > MAX_SOURCE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Source name must not exceed {MAX_SOURCE_NAME_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
