//! Run status and duration derivation shared by both notifiers.

use serde::Serialize;

/// Outcome of the workflow being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
        }
    }
}

/// Derive the run status from the raw inputs.
///
/// Failure whenever the start time is empty or the success flag is the
/// string `"0"`; success otherwise.
pub fn run_status(start_time: &str, workflow_success: &str) -> RunStatus {
    if start_time.trim().is_empty() || workflow_success == "0" {
        RunStatus::Failure
    } else {
        RunStatus::Success
    }
}

/// Whole seconds elapsed since `start_time` (epoch seconds).
///
/// A start time that does not parse as an integer yields 0 rather than a
/// nonsense duration; the status computation already reports such runs.
pub fn duration_since(start_time: &str, now_epoch: i64) -> i64 {
    match start_time.trim().parse::<i64>() {
        Ok(start) => now_epoch - start,
        Err(_) => 0,
    }
}
