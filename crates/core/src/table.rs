//! Tabular snapshot of the polled job list.
//!
//! [`JobTable::replace`] discards every existing row and rebuilds the
//! table from the given records, so the table always mirrors exactly
//! one poll response.

use std::sync::{Mutex, PoisonError};

use crate::jobs::JobStatusRecord;

/// Column headers, in cell order.
pub const COLUMNS: [&str; 5] = ["Job UUID", "Start Time", "End Time", "Status", "Result"];

/// Destination for rendered job snapshots.
pub trait TableView: Send + Sync {
    fn render(&self, records: &[JobStatusRecord]);
}

/// One rendered row. Every cell is display text; missing values are `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub job_uuid: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub result: String,
}

impl JobRow {
    pub fn from_record(record: &JobStatusRecord) -> Self {
        Self {
            job_uuid: record.job_uuid.clone(),
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone().unwrap_or_default(),
            status: record.status.clone(),
            result: result_cell(record.result.as_ref()),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.job_uuid.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.status.as_str(),
            self.result.as_str(),
        ]
    }
}

/// Display text for the `result` column.
///
/// `null` and absent values are blank, strings are unquoted, anything
/// else is compact JSON.
fn result_cell(result: Option<&serde_json::Value>) -> String {
    match result {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Rendered job table state.
#[derive(Debug, Default, Clone)]
pub struct JobTable {
    rows: Vec<JobRow>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all rows with one row per record, in input order.
    pub fn replace(&mut self, records: &[JobStatusRecord]) {
        self.rows.clear();
        self.rows.extend(records.iter().map(JobRow::from_record));
        tracing::debug!(rows = self.rows.len(), "Job table rendered");
    }

    pub fn rows(&self) -> &[JobRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TableView for Mutex<JobTable> {
    fn render(&self, records: &[JobStatusRecord]) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(records);
    }
}
