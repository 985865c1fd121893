//! One-shot playbook submission tied to one control.
//!
//! An [`ActionSubmitter`] disables its control, posts the playbook
//! request, reports the outcome on the console log and then restores the
//! control to the state it had before the trigger. Restoring is done by a
//! drop guard so it also happens when the trigger future is dropped
//! mid-request.

use std::sync::Arc;

use autolab_core::console::LogSink;
use autolab_core::controls::ControlHandle;
use autolab_core::error::CoreError;
use autolab_core::jobs::{JobRequest, StartedJob};
use tokio::task::JoinHandle;

use crate::api::JobApi;
use crate::error::SubmitError;

/// Outcome of one [`ActionSubmitter::trigger`] call.
pub type JobSubmissionResult = Result<StartedJob, SubmitError>;

/// Reads the current form values. `Ok(None)` means the action takes no
/// parameters.
pub type PayloadBuilder = Box<dyn Fn() -> Result<Option<JobRequest>, CoreError> + Send + Sync>;

/// Invoked with the server-assigned uuid once a job has started.
pub type StartedCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Console line for a started job.
pub fn started_message(job_uuid: &str) -> String {
    format!("Started job {job_uuid}")
}

/// Console line for a failed submission.
pub fn failure_message(error: &SubmitError) -> String {
    format!("Failure: {error}")
}

/// Submits one playbook and manages the enabled state of one control.
pub struct ActionSubmitter {
    api: Arc<dyn JobApi>,
    playbook: String,
    build_payload: PayloadBuilder,
    control: Arc<dyn ControlHandle>,
    log: Arc<dyn LogSink>,
    on_started: StartedCallback,
}

impl ActionSubmitter {
    /// Create a parameterless submitter for `playbook`.
    ///
    /// Started jobs are reported on `log` as `Started job <uuid>` unless
    /// replaced via [`on_started`](Self::on_started).
    pub fn new(
        api: Arc<dyn JobApi>,
        playbook: impl Into<String>,
        control: Arc<dyn ControlHandle>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        let started_log = Arc::clone(&log);
        Self {
            api,
            playbook: playbook.into(),
            build_payload: Box::new(|| Ok(None)),
            control,
            log,
            on_started: Box::new(move |job_uuid| started_log.append(&started_message(job_uuid))),
        }
    }

    /// Read request parameters from `build` on every trigger.
    pub fn with_payload<F>(mut self, build: F) -> Self
    where
        F: Fn() -> Result<Option<JobRequest>, CoreError> + Send + Sync + 'static,
    {
        self.build_payload = Box::new(build);
        self
    }

    /// Replace the started-job callback.
    pub fn on_started<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_started = Box::new(callback);
        self
    }

    pub fn playbook(&self) -> &str {
        &self.playbook
    }

    /// Whether the control can currently be clicked.
    pub fn is_ready(&self) -> bool {
        self.control.is_enabled()
    }

    /// Run one submission: disable, request, log, restore.
    ///
    /// Invalid form values are logged without sending a request and
    /// without touching the control. Does not check whether the control
    /// is already disabled; see [`dispatch`](Self::dispatch).
    pub async fn trigger(&self) -> JobSubmissionResult {
        let (request, in_flight) = self.begin()?;
        self.submit(request, in_flight).await
    }

    /// Click handler: disable synchronously, then run the request on a
    /// spawned task.
    ///
    /// A click on a disabled control is ignored, so a second click
    /// cannot start a duplicate job while the first is in flight.
    pub fn dispatch(self: &Arc<Self>) -> Dispatch {
        if !self.is_ready() {
            tracing::debug!(control = self.control.name(), "Ignoring click on disabled control");
            return Dispatch::Ignored;
        }

        match self.begin() {
            Ok((request, in_flight)) => {
                let submitter = Arc::clone(self);
                Dispatch::InFlight(tokio::spawn(async move {
                    submitter.submit(request, in_flight).await
                }))
            }
            Err(e) => Dispatch::Rejected(e),
        }
    }

    // ---- private helpers ----

    /// Read the form values and disable the control.
    fn begin(&self) -> Result<(Option<JobRequest>, DisabledWhileInFlight), SubmitError> {
        let request = (self.build_payload)().map_err(|e| {
            let err = SubmitError::Invalid(e);
            tracing::info!(playbook = %self.playbook, error = %err, "Submission rejected");
            self.log.append(&failure_message(&err));
            err
        })?;

        Ok((request, DisabledWhileInFlight::new(Arc::clone(&self.control))))
    }

    /// Send the request and report the outcome. The control is
    /// restored when `_in_flight` drops, after the log append.
    async fn submit(
        &self,
        request: Option<JobRequest>,
        _in_flight: DisabledWhileInFlight,
    ) -> JobSubmissionResult {
        tracing::debug!(playbook = %self.playbook, control = self.control.name(), "Submitting playbook");

        match self.api.submit_playbook(&self.playbook, request.as_ref()).await {
            Ok(started) => {
                (self.on_started)(&started.job_uuid);
                Ok(started)
            }
            Err(e) => {
                let err = SubmitError::Api(e);
                tracing::warn!(playbook = %self.playbook, error = %err, "Playbook submission failed");
                self.log.append(&failure_message(&err));
                Err(err)
            }
        }
    }
}

/// Result of [`ActionSubmitter::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    /// The control was disabled; nothing happened.
    Ignored,
    /// The form values were invalid; nothing was sent.
    Rejected(SubmitError),
    /// The request is running on the returned task.
    InFlight(JoinHandle<JobSubmissionResult>),
}

/// Keeps a control disabled for as long as it is alive, then puts back
/// the enabled state it found.
struct DisabledWhileInFlight {
    control: Arc<dyn ControlHandle>,
    was_enabled: bool,
}

impl DisabledWhileInFlight {
    fn new(control: Arc<dyn ControlHandle>) -> Self {
        let was_enabled = control.is_enabled();
        control.set_enabled(false);
        Self {
            control,
            was_enabled,
        }
    }
}

impl Drop for DisabledWhileInFlight {
    fn drop(&mut self) {
        self.control.set_enabled(self.was_enabled);
    }
}
