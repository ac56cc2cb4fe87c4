//! Workflow-command logging surface.
//!
//! The CI runner scrapes stdout for `::` command lines and collects named
//! outputs from the file named by `GITHUB_OUTPUT`. Informational lines are
//! plain stdout. These are fire-and-forget channels: a failed write must
//! never take an action down with it.

use std::io::Write;

/// Escape payload text for a workflow command line.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Informational log line.
pub fn info(message: &str) {
    println!("{}", message);
}

/// Debug log line. The runner only surfaces these when step debugging is on.
pub fn debug(message: &str) {
    println!("::debug::{}", escape_data(message));
}

/// Error log line.
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Publish a named output value for downstream pipeline steps.
///
/// Appends to the `GITHUB_OUTPUT` file when the runner provides one, and
/// falls back to the legacy stdout command otherwise.
pub fn set_output(name: &str, value: &str) {
    if let Ok(path) = std::env::var("GITHUB_OUTPUT") {
        if !path.is_empty() {
            let result = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .and_then(|mut file| writeln!(file, "{}={}", name, value));
            if result.is_ok() {
                return;
            }
        }
    }
    println!("::set-output name={}::{}", name, escape_data(value));
}
