use serde::{Deserialize, Serialize};

use super::job_status::JobStatus;
use super::job_type::JobType;

/// Snapshot of a server-side job, as returned by the status and list endpoints.
///
/// The client never mutates or deletes jobs; it only observes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "jobId")]
    pub id: String,
    /// Operation kind; omitted by the status endpoint
    #[serde(rename = "type", alias = "jobType", default)]
    pub job_type: Option<JobType>,
    pub status: JobStatus,
    /// Percent complete (0-100)
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub progress: u8,
    /// Output file, may be set before the job is COMPLETED
    #[serde(alias = "outputFileId", default)]
    pub result_file_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of every submit endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: JobStatus,
}
