//! Git execution seam.
//!
//! The Release Tagger issues a fixed sequence of git commands; putting the
//! execution behind a trait keeps that sequence testable without a real
//! repository, the same way the pipeline hides its step executor.

use crate::error::{Error, Result};
use crate::utils::command;

/// Committer identity used for release tags.
pub const GIT_USER_NAME: &str = "github-actions[bot]";
pub const GIT_USER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

pub trait GitRunner {
    /// Run `git <args>` and return trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String>;
}

/// Runs git as a subprocess, optionally pinned to a working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    cwd: Option<String>,
}

impl SystemGit {
    pub fn new() -> Self {
        Self { cwd: None }
    }

    pub fn in_dir(dir: impl Into<String>) -> Self {
        Self {
            cwd: Some(dir.into()),
        }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> Result<String> {
        let context = format!("git {}", args.first().copied().unwrap_or(""));
        let result = match &self.cwd {
            Some(dir) => command::run_in(dir, "git", args, &context),
            None => command::run("git", args, &context),
        };
        result.map_err(|e| Error::git_command_failed(describe(&e)))
    }
}

/// Pull the descriptive text out of a command error; the generic message is
/// useless in a swallowed-and-logged context.
fn describe(err: &Error) -> String {
    err.details["error"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| err.message.clone())
}
