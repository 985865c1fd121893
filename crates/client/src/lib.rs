//! Asynchronous job-lifecycle client for the Autolab playbook runner.
//!
//! Provides the REST API wrapper, the per-control action submitter and
//! the cancellable job poller that keep the panel state current.

pub mod api;
pub mod error;
pub mod poller;
pub mod submitter;
