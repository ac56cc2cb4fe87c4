//! Metrics sink client: pushes a workflow-completion record to Loki.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::context::RunContext;
use crate::error::{Error, ErrorCode, Result};
use crate::inputs;
use crate::status::{self, RunStatus};
use crate::workflow;

fn transport_error(err: &reqwest::Error) -> Error {
    Error::new(
        ErrorCode::TransportRequestFailed,
        format!("Failed to push to Loki: {}", err),
        json!({ "error": err.to_string() }),
    )
    .retryable(true)
}

fn timeout_error(timeout_ms: u64) -> Error {
    Error::new(
        ErrorCode::TransportTimeout,
        format!("Loki push request timed out after {}ms", timeout_ms),
        json!({ "timeoutMs": timeout_ms }),
    )
    .retryable(true)
}

fn status_error(code: u16, status_text: &str, body: &str) -> Error {
    Error::new(
        ErrorCode::TransportStatus,
        format!("Failed to push to Loki: {} {}", code, status_text),
        json!({ "status": code, "statusText": status_text, "body": body }),
    )
}

/// Configuration snapshot for one push, resolved once at the boundary.
#[derive(Debug, Clone)]
pub struct LokiConfig {
    pub start_time: String,
    pub workflow_name: String,
    pub workflow_success: String,
    pub push_url: String,
    pub push_token: String,
    pub app_name: String,
    /// Request bound in milliseconds; unbounded when absent.
    pub timeout_ms: Option<u64>,
    pub dry_run: bool,
}

impl LokiConfig {
    pub fn from_inputs() -> Result<Self> {
        Ok(Self {
            start_time: inputs::get("start-time")?,
            workflow_name: inputs::get("workflow-name")?,
            workflow_success: inputs::get("workflow-success")?,
            push_url: inputs::get("loki-push-url")?,
            push_token: inputs::get("prom-push-token")?,
            app_name: inputs::get("app-name")?,
            timeout_ms: inputs::get_u64("loki-timeout")?,
            dry_run: inputs::get_bool("dry-run")?,
        })
    }
}

/// The record Loki stores as the log line value.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub run_id: u64,
    pub name: String,
    pub duration: String,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamLabels {
    pub service: String,
    pub name: String,
    pub status: RunStatus,
    pub app: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LokiStream {
    pub stream: StreamLabels,
    pub values: Vec<[String; 2]>,
}

/// Loki push API envelope.
#[derive(Debug, Clone, Serialize)]
pub struct LokiPayload {
    pub streams: Vec<LokiStream>,
}

pub fn build_log_entry(config: &LokiConfig, ctx: &RunContext, now_epoch: i64) -> LogEntry {
    let duration = status::duration_since(&config.start_time, now_epoch);
    LogEntry {
        run_id: ctx.run_id,
        name: config.workflow_name.clone(),
        duration: format!("{}s", duration),
        status: status::run_status(&config.start_time, &config.workflow_success),
    }
}

/// Wrap a serialized log entry in the push API envelope, stamped at
/// submission time with nanosecond resolution.
pub fn build_payload(
    config: &LokiConfig,
    ctx: &RunContext,
    entry_json: String,
    now_ms: i64,
) -> LokiPayload {
    let log_timestamp = (now_ms * 1_000_000).to_string();
    LokiPayload {
        streams: vec![LokiStream {
            stream: StreamLabels {
                service: ctx.repository.clone(),
                name: config.workflow_name.clone(),
                status: status::run_status(&config.start_time, &config.workflow_success),
                app: config.app_name.clone(),
            },
            values: vec![[log_timestamp, entry_json]],
        }],
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReceipt {
    pub status: RunStatus,
    pub duration_seconds: i64,
    pub dry_run: bool,
    pub delivered: bool,
}

/// Push the completion record to the sink.
pub fn push(config: &LokiConfig, ctx: &RunContext) -> Result<PushReceipt> {
    let now = Utc::now();
    let entry = build_log_entry(config, ctx, now.timestamp());
    let duration_seconds = status::duration_since(&config.start_time, now.timestamp());

    let entry_json = serde_json::to_string(&entry)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize log entry".to_string())))?;
    workflow::info(&format!("Loki log entry: {}", entry_json));

    if config.dry_run {
        workflow::info("Dry run enabled, not pushing to Loki");
        return Ok(PushReceipt {
            status: entry.status,
            duration_seconds,
            dry_run: true,
            delivered: false,
        });
    }

    let payload = build_payload(config, ctx, entry_json, now.timestamp_millis());

    let mut builder = reqwest::blocking::Client::builder();
    if let Some(ms) = config.timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    let client = builder
        .build()
        .map_err(|e| Error::internal_io(e.to_string(), Some("create HTTP client".to_string())))?;

    let response = client
        .post(&config.push_url)
        .header("Authorization", format!("Basic {}", config.push_token))
        .json(&payload)
        .send();

    let response = match response {
        Ok(response) => response,
        Err(err) if err.is_timeout() => {
            let err = timeout_error(config.timeout_ms.unwrap_or_default());
            workflow::error(&err.message);
            return Err(err);
        }
        Err(err) => {
            // Network-level failures are logged and re-raised unchanged.
            let err = transport_error(&err);
            workflow::error(&err.message);
            return Err(err);
        }
    };

    let http_status = response.status();
    if !http_status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(status_error(
            http_status.as_u16(),
            http_status.canonical_reason().unwrap_or(""),
            &body,
        ));
    }

    Ok(PushReceipt {
        status: entry.status,
        duration_seconds,
        dry_run: false,
        delivered: true,
    })
}
