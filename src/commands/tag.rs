use clap::Args;

use signalman::git::SystemGit;
use signalman::tag::{self, TagConfig, TagOutcome};

use super::CmdResult;

#[derive(Args)]
pub struct TagArgs {
    /// Validate and configure identity without tagging or pushing
    #[arg(long)]
    dry_run: bool,
}

/// Tag a release from the configured version file. Validation and git
/// failures are logged and reflected in the outcome, not the exit code.
pub fn run_json(args: TagArgs) -> CmdResult<TagOutcome> {
    let mut config = TagConfig::from_inputs()?;
    config.dry_run = config.dry_run || args.dry_run;
    let outcome = tag::tag_release(&config, &SystemGit::new());
    Ok((outcome, 0))
}
