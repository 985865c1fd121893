//! REST API client for the Autolab playbook runner.
//!
//! Wraps the runner's HTTP endpoints (playbook submission, job listing,
//! single-job lookup) using [`reqwest`]. [`JobApi`] is the seam the
//! submitter and poller are written against, so they can be driven by
//! an in-memory fake in tests.

use async_trait::async_trait;
use autolab_core::jobs::{request_body, JobRequest, JobStatusRecord, StartedJob};
use reqwest::header::{HeaderValue, ACCEPT};

use crate::error::ApiError;

/// Path prefix the runner mounts its API under.
pub const API_PREFIX: &str = "/api/v1";

/// Operations the panel needs from the job API.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Start `playbook` (e.g. `create-vm.yml`) with optional bindings.
    async fn submit_playbook(
        &self,
        playbook: &str,
        request: Option<&JobRequest>,
    ) -> Result<StartedJob, ApiError>;

    /// Current job list, in server order.
    async fn list_jobs(&self) -> Result<Vec<JobStatusRecord>, ApiError>;

    /// A single job by its uuid.
    async fn get_job(&self, job_uuid: &str) -> Result<JobStatusRecord, ApiError>;
}

/// HTTP client for a single runner instance.
pub struct AutolabApi {
    client: reqwest::Client,
    api_url: String,
}

impl AutolabApi {
    /// Create a new API client.
    ///
    /// * `base_url` - runner origin, e.g. `http://host:8000`. The
    ///   `/api/v1` prefix is appended here.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            api_url: format!("{}{API_PREFIX}", base_url.trim_end_matches('/')),
        }
    }

    /// Full API URL including the version prefix.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    /// `{api_url}/jobs/{job_uuid}` with the uuid percent-encoded as a
    /// single path segment.
    fn job_url(&self, job_uuid: &str) -> Result<reqwest::Url, ApiError> {
        if matches!(job_uuid, "" | "." | "..") {
            return Err(ApiError::InvalidJobUuid(job_uuid.to_string()));
        }

        let jobs_url = format!("{}/jobs", self.api_url);
        let mut url = reqwest::Url::parse(&jobs_url).map_err(|e| ApiError::InvalidUrl {
            url: jobs_url.clone(),
            message: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: jobs_url.clone(),
                message: "URL cannot carry a path".to_string(),
            })?
            .push(job_uuid);
        Ok(url)
    }

    /// Return the response unchanged on success, or an
    /// [`ApiError::HttpStatus`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    ///
    /// Shape mismatches, including missing fields, become
    /// [`ApiError::Protocol`] with the raw body attached.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Protocol {
            message: e.to_string(),
            body,
        })
    }
}

#[async_trait]
impl JobApi for AutolabApi {
    /// Sends `POST /playbooks/{playbook}` with the extravars envelope.
    async fn submit_playbook(
        &self,
        playbook: &str,
        request: Option<&JobRequest>,
    ) -> Result<StartedJob, ApiError> {
        let response = self
            .client
            .post(format!("{}/playbooks/{playbook}", self.api_url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&request_body(request))
            .send()
            .await?;

        let started: StartedJob = Self::parse_response(response).await?;
        tracing::info!(playbook, job_uuid = %started.job_uuid, "Playbook submitted");
        Ok(started)
    }

    /// Sends `GET /jobs`.
    async fn list_jobs(&self) -> Result<Vec<JobStatusRecord>, ApiError> {
        let response = self
            .client
            .get(format!("{}/jobs", self.api_url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends `GET /jobs/{job_uuid}`. An unknown uuid is a 404.
    async fn get_job(&self, job_uuid: &str) -> Result<JobStatusRecord, ApiError> {
        let response = self
            .client
            .get(self.job_url(job_uuid)?)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
