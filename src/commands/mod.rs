pub type CmdResult<T> = signalman::Result<(T, i32)>;

pub mod loki;
pub mod run;
pub mod slack;
pub mod tag;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run_json($args))
    };
}

pub(crate) fn run_json(command: crate::Commands) -> (signalman::Result<serde_json::Value>, i32) {
    crate::tty::status("signalman is working...");

    match command {
        crate::Commands::Run(args) => dispatch!(args, run),
        crate::Commands::Loki(args) => dispatch!(args, loki),
        crate::Commands::Slack(args) => dispatch!(args, slack),
        crate::Commands::Tag(args) => dispatch!(args, tag),
    }
}
