use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{loki, run, slack, tag};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "signalman")]
#[command(version = VERSION)]
#[command(about = "CLI for CI workflow notifications and release tagging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full notification batch for the current environment
    Run(run::RunArgs),
    /// Push the workflow completion record to the Loki sink
    Loki(loki::LokiArgs),
    /// Post the workflow summary to the Slack webhook
    Slack(slack::SlackArgs),
    /// Tag and push a release from the version file
    Tag(tag::TagArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = commands::run_json(cli.command);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
