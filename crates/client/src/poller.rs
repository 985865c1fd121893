//! Self-rescheduling job list poller.
//!
//! [`JobPoller::start`] fetches the job list immediately, hands the
//! result to the table and then sleeps for a fixed delay before the
//! next fetch, whatever the outcome of the previous one. Poll failures
//! are only reported through `tracing`. The loop runs until the
//! [`CancellationToken`] behind the returned [`PollerHandle`] fires.

use std::sync::Arc;
use std::time::Duration;

use autolab_core::table::TableView;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::JobApi;
use crate::error::ApiError;

/// Delay between the end of one fetch and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// How long [`PollerHandle::stop`] waits for the loop to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches the job list and renders it into a table.
pub struct JobPoller {
    api: Arc<dyn JobApi>,
    table: Arc<dyn TableView>,
    interval: Duration,
}

impl JobPoller {
    pub fn new(api: Arc<dyn JobApi>, table: Arc<dyn TableView>) -> Self {
        Self {
            api,
            table,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One poll cycle. On success the table is replaced and the row
    /// count returned; on failure the table is left untouched.
    pub async fn poll_once(&self) -> Result<usize, ApiError> {
        let records = self.api.list_jobs().await?;
        self.table.render(&records);

        let finished = records
            .iter()
            .filter(|r| r.job_status().is_terminal())
            .count();
        tracing::debug!(rows = records.len(), finished, "Job list refreshed");
        Ok(records.len())
    }

    /// Spawn the perpetual poll loop.
    pub fn start(self, cancel: CancellationToken) -> PollerHandle {
        let poller = Arc::new(self);
        let task = tokio::spawn(run_poll_loop(Arc::clone(&poller), cancel.clone()));

        PollerHandle {
            poller,
            cancel,
            task,
        }
    }

    /// Poll once and report failures on the diagnostic channel only.
    async fn cycle(&self) {
        if let Err(e) = self.poll_once().await {
            tracing::warn!(error = %e, "Failed to fetch job list");
        }
    }
}

/// Handle to a running [`JobPoller`].
pub struct PollerHandle {
    poller: Arc<JobPoller>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Fetch immediately without touching the schedule.
    ///
    /// Runs concurrently with any scheduled fetch; whichever response
    /// completes last is what the table shows.
    pub fn manual_refresh(&self) -> JoinHandle<()> {
        let poller = Arc::clone(&self.poller);
        tracing::debug!("Manual job list refresh");
        tokio::spawn(async move { poller.cycle().await })
    }

    /// Whether the poll loop task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, self.task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Job poller task failed"),
            Err(_) => tracing::warn!("Job poller did not stop within {STOP_TIMEOUT:?}"),
        }
    }
}

/// Fetch, sleep, repeat until cancelled.
async fn run_poll_loop(poller: Arc<JobPoller>, cancel: CancellationToken) {
    tracing::info!(
        interval_ms = poller.interval.as_millis() as u64,
        "Job poller started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = poller.cycle() => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(poller.interval) => {}
        }
    }

    tracing::info!("Job poller stopped");
}
