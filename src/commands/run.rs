use clap::Args;

use signalman::orchestrator::{self, RunReport};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {}

/// Execute the full notification batch. Per-action failures are reported
/// in the output and on the error channel; the command itself succeeds.
pub fn run_json(_args: RunArgs) -> CmdResult<RunReport> {
    Ok((orchestrator::run(), 0))
}
