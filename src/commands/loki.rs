use clap::Args;

use signalman::context::RunContext;
use signalman::loki::{self, LokiConfig, PushReceipt};

use super::CmdResult;

#[derive(Args)]
pub struct LokiArgs {
    /// Compute and log the record without transmitting
    #[arg(long)]
    dry_run: bool,
}

pub fn run_json(args: LokiArgs) -> CmdResult<PushReceipt> {
    let mut config = LokiConfig::from_inputs()?;
    config.dry_run = config.dry_run || args.dry_run;
    let ctx = RunContext::from_env()?;
    let receipt = loki::push(&config, &ctx)?;
    Ok((receipt, 0))
}
