//! Terminal rendering of the panel state.
//!
//! Stdout is the operator's view; diagnostics go to stderr via
//! `tracing`.

use std::sync::{Mutex, PoisonError};

use autolab_core::console::{ConsoleLog, LogSink};
use autolab_core::jobs::JobStatusRecord;
use autolab_core::table::{JobRow, COLUMNS};

/// Console log that can echo each appended line to stdout.
pub struct OperatorConsole {
    log: Mutex<ConsoleLog>,
    echo: bool,
}

impl OperatorConsole {
    pub fn new(echo: bool) -> Self {
        Self {
            log: Mutex::new(ConsoleLog::new()),
            echo,
        }
    }

    /// Full accumulated console text.
    pub fn text(&self) -> String {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .text()
            .to_string()
    }

    /// Console entries in append order.
    pub fn lines(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl LogSink for OperatorConsole {
    fn append(&self, message: &str) {
        self.log.append(message);
        if self.echo {
            println!("{message}");
        }
    }
}

/// Render rows as a left-aligned text table with a header line.
pub fn format_table(rows: &[JobRow]) -> String {
    let mut widths = COLUMNS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, COLUMNS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_line(&mut out, row.cells(), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .into_iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Multi-line description of a single job, ending with whether the
/// runner has finished with it.
pub fn format_record(record: &JobStatusRecord) -> String {
    let row = JobRow::from_record(record);
    let finished = if record.job_status().is_terminal() {
        "yes"
    } else {
        "no"
    };
    COLUMNS
        .iter()
        .zip(row.cells())
        .map(|(name, value)| format!("{name}: {value}"))
        .chain(std::iter::once(format!("Finished: {finished}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered console entries. Continuation lines of a multi-line entry
/// are indented under it.
pub fn format_console(lines: &[String]) -> String {
    let mut out = String::new();
    for (i, entry) in lines.iter().enumerate() {
        for (j, part) in entry.split('\n').enumerate() {
            if j == 0 {
                out.push_str(&format!("{:>3}  {part}\n", i + 1));
            } else {
                out.push_str(&format!("     {part}\n"));
            }
        }
    }
    out
}
