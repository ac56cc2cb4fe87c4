//! Chat client: posts a human-readable run summary to a Slack webhook.

use chrono::Utc;
use serde_json::json;

use crate::context::RunContext;
use crate::error::{Error, ErrorCode, Result};
use crate::inputs;
use crate::status::{self, RunStatus};
use crate::workflow;

fn transport_error(err: &reqwest::Error) -> Error {
    Error::new(
        ErrorCode::TransportRequestFailed,
        format!("Failed to push to Slack: {}", err),
        json!({ "error": err.to_string() }),
    )
    .retryable(true)
}

fn status_error(code: u16, status_text: &str, body: &str) -> Error {
    Error::new(
        ErrorCode::TransportStatus,
        format!("Failed to push to Slack: {} {} - {}", code, status_text, body),
        json!({ "status": code, "statusText": status_text, "body": body }),
    )
}

/// Configuration snapshot for one notification.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub start_time: String,
    pub workflow_name: String,
    pub workflow_success: String,
    pub app_name: String,
    pub github_url: String,
    pub service_url: String,
    pub image_name: String,
    pub image_tag: String,
    pub webhook_url: String,
    pub dry_run: bool,
}

impl SlackConfig {
    pub fn from_inputs() -> Result<Self> {
        Ok(Self {
            start_time: inputs::get("start-time")?,
            workflow_name: inputs::get("workflow-name")?,
            workflow_success: inputs::get("workflow-success")?,
            app_name: inputs::get("app-name")?,
            github_url: inputs::get("github-url")?,
            service_url: inputs::get("service-url")?,
            image_name: inputs::get("image-name")?,
            image_tag: inputs::get("image-tag")?,
            webhook_url: inputs::get("cicd-slack-webhook")?,
            dry_run: inputs::get_bool("dry-run")?,
        })
    }
}

/// Compose the multi-line summary message.
pub fn compose_message(config: &SlackConfig, ctx: &RunContext, now_epoch: i64) -> String {
    let run_status = status::run_status(&config.start_time, &config.workflow_success);
    let duration = status::duration_since(&config.start_time, now_epoch);

    [
        format!(
            "*{}* workflow in *{}* has completed with status: *{}*",
            config.workflow_name,
            config.app_name,
            run_status.as_str().to_uppercase()
        ),
        format!("*Duration:* {} seconds", duration),
        format!(
            "*Details:* {}/{}/actions/runs/{}",
            config.github_url, ctx.repository, ctx.run_id
        ),
        format!("Service URL: {}", config.service_url),
        format!("Image: {}:{}", config.image_name, config.image_tag),
    ]
    .join("\n")
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyReceipt {
    pub status: RunStatus,
    pub duration_seconds: i64,
    pub dry_run: bool,
    pub delivered: bool,
}

/// Post the summary to the webhook.
pub fn notify(config: &SlackConfig, ctx: &RunContext) -> Result<NotifyReceipt> {
    let now_epoch = Utc::now().timestamp();
    let run_status = status::run_status(&config.start_time, &config.workflow_success);
    let duration_seconds = status::duration_since(&config.start_time, now_epoch);
    let message = compose_message(config, ctx, now_epoch);

    if config.dry_run {
        workflow::info("Dry run enabled, not sending to Slack");
        return Ok(NotifyReceipt {
            status: run_status,
            duration_seconds,
            dry_run: true,
            delivered: false,
        });
    }

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&config.webhook_url)
        .json(&json!({ "text": message }))
        .send()
        .map_err(|e| transport_error(&e))?;

    let http_status = response.status();
    if http_status.as_u16() >= 400 {
        let body = response.text().unwrap_or_default();
        return Err(status_error(
            http_status.as_u16(),
            http_status.canonical_reason().unwrap_or(""),
            &body,
        ));
    }

    Ok(NotifyReceipt {
        status: run_status,
        duration_seconds,
        dry_run: false,
        delivered: true,
    })
}
