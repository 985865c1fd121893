#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use autolab_client::api::JobApi;
use autolab_client::error::ApiError;
use autolab_core::jobs::{JobRequest, JobStatusRecord, StartedJob};
use autolab_panel::config::PanelConfig;

/// Scripted in-memory runner.
#[derive(Default)]
pub struct FakeRunner {
    submit_results: Mutex<VecDeque<Result<StartedJob, ApiError>>>,
    jobs: Mutex<Vec<JobStatusRecord>>,
    fail_listing: Mutex<bool>,
    panic_listing: Mutex<bool>,
    submissions: Mutex<Vec<(String, serde_json::Value)>>,
    list_calls: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_submit(&self, result: Result<StartedJob, ApiError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn started(&self, job_uuid: &str) {
        self.push_submit(Ok(StartedJob {
            job_uuid: job_uuid.to_string(),
        }));
    }

    pub fn set_jobs(&self, jobs: Vec<JobStatusRecord>) {
        *self.jobs.lock().unwrap() = jobs;
    }

    pub fn fail_listing(&self, fail: bool) {
        *self.fail_listing.lock().unwrap() = fail;
    }

    pub fn panic_listing(&self, panic: bool) {
        *self.panic_listing.lock().unwrap() = panic;
    }

    /// `(playbook, body)` pairs, as they would appear on the wire.
    pub fn submissions(&self) -> Vec<(String, serde_json::Value)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobApi for FakeRunner {
    async fn submit_playbook(
        &self,
        playbook: &str,
        request: Option<&JobRequest>,
    ) -> Result<StartedJob, ApiError> {
        self.submissions.lock().unwrap().push((
            playbook.to_string(),
            autolab_core::jobs::request_body(request),
        ));
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(StartedJob {
                    job_uuid: "unscripted".to_string(),
                })
            })
    }

    async fn list_jobs(&self) -> Result<Vec<JobStatusRecord>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.panic_listing.lock().unwrap() {
            panic!("listing exploded");
        }
        if *self.fail_listing.lock().unwrap() {
            return Err(ApiError::HttpStatus {
                status: 503,
                body: "runner unavailable".to_string(),
            });
        }
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn get_job(&self, job_uuid: &str) -> Result<JobStatusRecord, ApiError> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.job_uuid == job_uuid)
            .cloned()
            .ok_or_else(|| ApiError::HttpStatus {
                status: 404,
                body: r#"{"detail":"Job not found"}"#.to_string(),
            })
    }
}

pub fn test_config() -> PanelConfig {
    PanelConfig {
        api_url: "http://localhost:8000".to_string(),
        poll_interval: Duration::from_millis(5000),
        echo_console: false,
    }
}

pub fn running(job_uuid: &str) -> JobStatusRecord {
    JobStatusRecord {
        job_uuid: job_uuid.to_string(),
        start_time: "t0".to_string(),
        end_time: None,
        status: "running".to_string(),
        result: None,
    }
}
