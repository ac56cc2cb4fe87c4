//! Run context supplied by the CI runner environment.

use serde::Serialize;
use serde_json::json;

use crate::error::{Error, ErrorCode, Result};

fn env_missing(name: &str) -> Error {
    Error::new(
        ErrorCode::InputMissing,
        format!("Missing required environment variable: {}", name),
        json!({ "name": name }),
    )
}

/// Identity of the workflow run this invocation belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub run_id: u64,
    /// `owner/repo` slug, used verbatim as the `service` stream label.
    pub repository: String,
}

impl RunContext {
    pub fn from_env() -> Result<Self> {
        let run_id = std::env::var("GITHUB_RUN_ID")
            .map_err(|_| env_missing("GITHUB_RUN_ID"))?
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                Error::input_invalid_value(
                    "GITHUB_RUN_ID",
                    None,
                    "expected a numeric run identifier",
                )
            })?;

        let repository = std::env::var("GITHUB_REPOSITORY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| env_missing("GITHUB_REPOSITORY"))?;

        Ok(Self { run_id, repository })
    }
}
