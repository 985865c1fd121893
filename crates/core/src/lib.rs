//! Client-side state for the Autolab control panel.
//!
//! Holds the job data model exchanged with the playbook runner API and
//! the operator-facing state objects (console log, job table, controls)
//! that the submitter and poller mutate.

pub mod console;
pub mod controls;
pub mod error;
pub mod jobs;
pub mod playbooks;
pub mod table;
pub mod types;
