//! Job payloads exchanged with the playbook runner API.
//!
//! [`JobRequest`] is what the panel sends when it starts a playbook,
//! [`StartedJob`] is the server's acknowledgement and
//! [`JobStatusRecord`] is one row of the polled job list.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::JobUuid;

// ---------------------------------------------------------------------------
// JobRequest
// ---------------------------------------------------------------------------

/// Parameter bindings for one playbook invocation.
///
/// Keys are kept sorted so the serialized body is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    extravars: BTreeMap<String, String>,
}

impl JobRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any earlier binding.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extravars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.extravars.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.extravars.is_empty()
    }

    /// JSON body for `POST /playbooks/{name}`.
    ///
    /// An empty request produces `{}` rather than an empty envelope.
    pub fn to_body(&self) -> serde_json::Value {
        if self.is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::json!({ "extravars": self.extravars })
        }
    }
}

/// Body to send for an optional request. `None` behaves like an empty request.
pub fn request_body(request: Option<&JobRequest>) -> serde_json::Value {
    request.map(JobRequest::to_body).unwrap_or_else(|| JobRequest::new().to_body())
}

// ---------------------------------------------------------------------------
// StartedJob
// ---------------------------------------------------------------------------

/// Response returned by a playbook endpoint after queuing a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedJob {
    pub job_uuid: JobUuid,
}

// ---------------------------------------------------------------------------
// JobStatusRecord
// ---------------------------------------------------------------------------

/// One entry of the `GET /jobs` listing.
///
/// `job_uuid`, `start_time` and `status` are required; a record missing
/// any of them fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusRecord {
    pub job_uuid: JobUuid,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub status: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl JobStatusRecord {
    /// Typed view of the opaque `status` string.
    pub fn job_status(&self) -> JobStatus {
        JobStatus::from(self.status.as_str())
    }
}

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Runner states reported by the server.
///
/// Unrecognized values are preserved in [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Starting,
    Running,
    Successful,
    Timeout,
    Failed,
    Canceled,
    Other(String),
}

impl JobStatus {
    /// Whether the job has stopped running.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Successful | Self::Timeout | Self::Failed | Self::Canceled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Successful => "successful",
            Self::Timeout => "timeout",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "starting" => Self::Starting,
            "running" => Self::Running,
            "successful" => Self::Successful,
            "timeout" => Self::Timeout,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
