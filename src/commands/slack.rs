use clap::Args;

use signalman::context::RunContext;
use signalman::slack::{self, NotifyReceipt, SlackConfig};

use super::CmdResult;

#[derive(Args)]
pub struct SlackArgs {
    /// Compose the message without sending it
    #[arg(long)]
    dry_run: bool,
}

pub fn run_json(args: SlackArgs) -> CmdResult<NotifyReceipt> {
    let mut config = SlackConfig::from_inputs()?;
    config.dry_run = config.dry_run || args.dry_run;
    let ctx = RunContext::from_env()?;
    let receipt = slack::notify(&config, &ctx)?;
    Ok((receipt, 0))
}
