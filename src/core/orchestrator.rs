//! Sequential multi-action dispatcher with per-action failure isolation.
//!
//! Action selection is a pure function over the environment input; each
//! selected action resolves its own configuration and runs to completion
//! before the next starts. A failing action is logged and the batch
//! continues — `run` itself never fails.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Local;
use serde::Serialize;

use crate::context::RunContext;
use crate::error::Result;
use crate::git::SystemGit;
use crate::inputs;
use crate::{loki, slack, tag, workflow};

/// Environment value that enables release tagging.
pub const STAGING_ENVIRONMENT: &str = "staging";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    TagRelease,
    LokiPush,
    SlackNotify,
}

impl ActionKind {
    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::TagRelease => "tag-release",
            ActionKind::LokiPush => "loki-push",
            ActionKind::SlackNotify => "slack-notify",
        }
    }
}

/// Resolve the ordered action list for an environment.
///
/// Staging runs the release tagger first; the two notifiers always run, in
/// sink-then-chat order.
pub fn select_actions(environment: Option<&str>) -> Vec<ActionKind> {
    let mut actions = Vec::new();
    if environment == Some(STAGING_ENVIRONMENT) {
        actions.push(ActionKind::TagRelease);
    }
    actions.push(ActionKind::LokiPush);
    actions.push(ActionKind::SlackNotify);
    actions
}

/// One runnable unit of the batch.
pub trait Action {
    fn id(&self) -> &str;
    fn execute(&self) -> Result<()>;
}

struct LokiPushAction;

impl Action for LokiPushAction {
    fn id(&self) -> &str {
        ActionKind::LokiPush.id()
    }

    fn execute(&self) -> Result<()> {
        let config = loki::LokiConfig::from_inputs()?;
        let ctx = RunContext::from_env()?;
        loki::push(&config, &ctx)?;
        Ok(())
    }
}

struct SlackNotifyAction;

impl Action for SlackNotifyAction {
    fn id(&self) -> &str {
        ActionKind::SlackNotify.id()
    }

    fn execute(&self) -> Result<()> {
        let config = slack::SlackConfig::from_inputs()?;
        let ctx = RunContext::from_env()?;
        slack::notify(&config, &ctx)?;
        Ok(())
    }
}

struct TagReleaseAction;

impl Action for TagReleaseAction {
    fn id(&self) -> &str {
        ActionKind::TagRelease.id()
    }

    fn execute(&self) -> Result<()> {
        let config = tag::TagConfig::from_inputs()?;
        // Validation and git failures are already swallowed inside.
        tag::tag_release(&config, &SystemGit::new());
        Ok(())
    }
}

fn build_action(kind: ActionKind) -> Box<dyn Action> {
    match kind {
        ActionKind::TagRelease => Box::new(TagReleaseAction),
        ActionKind::LokiPush => Box::new(LokiPushAction),
        ActionKind::SlackNotify => Box::new(SlackNotifyAction),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub actions: Vec<ActionOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunReport {
    /// Semicolon-joined failure summary; empty when every action succeeded.
    pub fn summary(&self) -> String {
        self.actions
            .iter()
            .filter_map(|outcome| {
                outcome
                    .error
                    .as_ref()
                    .map(|error| format!("{}: {}", outcome.id, error))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Execute actions strictly in order, isolating each failure.
///
/// A returned error is logged as `Action failed with error: <message>`.
/// A panic (the anything-can-be-thrown path) is normalized to
/// `Action failed with an unknown error`. Neither stops the batch.
pub fn run_actions(actions: &[Box<dyn Action>], environment: Option<String>) -> RunReport {
    let mut outcomes = Vec::with_capacity(actions.len());

    for action in actions {
        let outcome = match catch_unwind(AssertUnwindSafe(|| action.execute())) {
            Ok(Ok(())) => ActionOutcome {
                id: action.id().to_string(),
                success: true,
                error: None,
            },
            Ok(Err(err)) => {
                workflow::error(&format!("Action failed with error: {}", err));
                ActionOutcome {
                    id: action.id().to_string(),
                    success: false,
                    error: Some(err.message),
                }
            }
            Err(_) => {
                workflow::error("Action failed with an unknown error");
                ActionOutcome {
                    id: action.id().to_string(),
                    success: false,
                    error: Some("unknown error".to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.success).count();
    let failed = outcomes.len() - succeeded;

    RunReport {
        environment,
        actions: outcomes,
        succeeded,
        failed,
    }
}

/// Run the full batch for the current environment.
///
/// Always completes: per-action failures are visible on the error channel
/// and in the report, never as a failure of `run` itself.
pub fn run() -> RunReport {
    let environment = inputs::get_optional("environment");
    let kinds = select_actions(environment.as_deref());

    workflow::debug(&format!(
        "Resolved actions: {}",
        kinds
            .iter()
            .map(|k| k.id())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    let actions: Vec<Box<dyn Action>> = kinds.into_iter().map(build_action).collect();
    let report = run_actions(&actions, environment);

    workflow::set_output("time", &Local::now().format("%H:%M:%S").to_string());
    workflow::set_output("report", &report.summary());

    report
}
