#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderMap, StatusCode,
};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use autolab_client::api::JobApi;
use autolab_client::error::ApiError;
use autolab_core::controls::ControlHandle;
use autolab_core::jobs::{JobRequest, JobStatusRecord, StartedJob};

// ---------------------------------------------------------------------------
// In-process fake runner (real HTTP)
// ---------------------------------------------------------------------------

/// One request received by the fake runner's playbook route.
#[derive(Debug, Clone)]
pub struct ReceivedSubmission {
    pub playbook: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: serde_json::Value,
}

/// One `GET` received on the job routes. `job_uuid` is the decoded path
/// parameter, `None` for the listing route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedLookup {
    pub job_uuid: Option<String>,
    pub accept: Option<String>,
}

/// Shared state of the fake runner. Tests mutate it to script responses.
#[derive(Clone)]
pub struct RunnerState {
    pub submissions: Arc<Mutex<Vec<ReceivedSubmission>>>,
    pub lookups: Arc<Mutex<Vec<ReceivedLookup>>>,
    pub submit_response: Arc<Mutex<(u16, String)>>,
    pub jobs_response: Arc<Mutex<(u16, String)>>,
}

impl RunnerState {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
            submit_response: Arc::new(Mutex::new((200, r#"{"job_uuid":"abc-123"}"#.into()))),
            jobs_response: Arc::new(Mutex::new((200, "[]".into()))),
        }
    }

    pub fn respond_to_submit(&self, status: u16, body: &str) {
        *self.submit_response.lock().unwrap() = (status, body.to_string());
    }

    pub fn respond_to_jobs(&self, status: u16, body: &str) {
        *self.jobs_response.lock().unwrap() = (status, body.to_string());
    }

    pub fn submissions(&self) -> Vec<ReceivedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<ReceivedLookup> {
        self.lookups.lock().unwrap().clone()
    }

    fn record_lookup(&self, job_uuid: Option<String>, headers: &HeaderMap) {
        self.lookups.lock().unwrap().push(ReceivedLookup {
            job_uuid,
            accept: header(headers, ACCEPT),
        });
    }
}

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn scripted((status, body): (u16, String)) -> Response {
    (
        StatusCode::from_u16(status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn submit_playbook(
    State(state): State<RunnerState>,
    Path(playbook): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = header(&headers, CONTENT_TYPE);
    let accept = header(&headers, ACCEPT);
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    state.submissions.lock().unwrap().push(ReceivedSubmission {
        playbook,
        content_type,
        accept,
        body,
    });

    let response = state.submit_response.lock().unwrap().clone();
    scripted(response)
}

async fn list_jobs(State(state): State<RunnerState>, headers: HeaderMap) -> Response {
    state.record_lookup(None, &headers);
    let response = state.jobs_response.lock().unwrap().clone();
    scripted(response)
}

async fn get_job(
    State(state): State<RunnerState>,
    Path(job_uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record_lookup(Some(job_uuid.clone()), &headers);
    let (_, body) = state.jobs_response.lock().unwrap().clone();
    let jobs: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap_or_default();

    match jobs.into_iter().find(|j| j["job_uuid"] == job_uuid.as_str()) {
        Some(job) => Json(job).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Job not found"})),
        )
            .into_response(),
    }
}

/// Serve the fake runner on an ephemeral port and return its base URL.
pub async fn spawn_runner(state: RunnerState) -> String {
    let app = Router::new()
        .route("/api/v1/playbooks/{playbook}", post(submit_playbook))
        .route("/api/v1/jobs", get(list_jobs))
        .route("/api/v1/jobs/{job_uuid}", get(get_job))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Base URL of a port with nothing listening on it.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// In-memory JobApi
// ---------------------------------------------------------------------------

/// Scripted [`JobApi`] that records every call.
///
/// Unscripted submissions succeed with `job-<n>`; unscripted listings
/// return an empty list. A listing response is taken from the queue when
/// the call starts and returned after its delay.
#[derive(Default)]
pub struct FakeJobApi {
    submit_results: Mutex<VecDeque<Result<StartedJob, ApiError>>>,
    list_results: Mutex<VecDeque<(Duration, Result<Vec<JobStatusRecord>, ApiError>)>>,
    submissions: Mutex<Vec<(String, Option<JobRequest>)>>,
    list_calls: AtomicUsize,
    panic_on_list: AtomicBool,
    watched: Mutex<Option<Arc<dyn ControlHandle>>>,
    enabled_during_submit: Mutex<Vec<bool>>,
}

impl FakeJobApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_submit(&self, result: Result<StartedJob, ApiError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn push_list(&self, result: Result<Vec<JobStatusRecord>, ApiError>) {
        self.push_list_after(Duration::ZERO, result);
    }

    pub fn push_list_after(
        &self,
        delay: Duration,
        result: Result<Vec<JobStatusRecord>, ApiError>,
    ) {
        self.list_results.lock().unwrap().push_back((delay, result));
    }

    /// Make every later listing call panic.
    pub fn panic_on_list(&self) {
        self.panic_on_list.store(true, Ordering::SeqCst);
    }

    /// Record `control`'s enabled state whenever a submission arrives.
    pub fn watch(&self, control: Arc<dyn ControlHandle>) {
        *self.watched.lock().unwrap() = Some(control);
    }

    pub fn submissions(&self) -> Vec<(String, Option<JobRequest>)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn enabled_during_submit(&self) -> Vec<bool> {
        self.enabled_during_submit.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobApi for FakeJobApi {
    async fn submit_playbook(
        &self,
        playbook: &str,
        request: Option<&JobRequest>,
    ) -> Result<StartedJob, ApiError> {
        if let Some(control) = self.watched.lock().unwrap().as_ref() {
            self.enabled_during_submit
                .lock()
                .unwrap()
                .push(control.is_enabled());
        }

        let n = {
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push((playbook.to_string(), request.cloned()));
            submissions.len()
        };

        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(StartedJob {
                    job_uuid: format!("job-{n}"),
                })
            })
    }

    async fn list_jobs(&self) -> Result<Vec<JobStatusRecord>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_list.load(Ordering::SeqCst) {
            panic!("listing exploded");
        }
        let next = self.list_results.lock().unwrap().pop_front();
        let (delay, result) = next.unwrap_or_else(|| (Duration::ZERO, Ok(Vec::new())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_job(&self, job_uuid: &str) -> Result<JobStatusRecord, ApiError> {
        Err(ApiError::HttpStatus {
            status: 404,
            body: format!("no job {job_uuid}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn record(uuid: &str, status: &str) -> JobStatusRecord {
    JobStatusRecord {
        job_uuid: uuid.to_string(),
        start_time: "t0".to_string(),
        end_time: None,
        status: status.to_string(),
        result: None,
    }
}

pub fn server_error() -> ApiError {
    ApiError::HttpStatus {
        status: 503,
        body: "runner unavailable".to_string(),
    }
}
