//! Release tagger: validates the version file and publishes a release tag.
//!
//! Unlike the notifiers, nothing past input resolution propagates: a bad
//! version file or a failed git command is logged and swallowed so the rest
//! of the batch is never held hostage by tagging.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, ErrorCode, Result};
use crate::git::{GitRunner, GIT_USER_EMAIL, GIT_USER_NAME};
use crate::inputs;
use crate::workflow;

/// Strict three-component semver, no pre-release or build metadata.
pub const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

fn invalid_version_error(file: &str) -> Error {
    Error::validation_invalid_argument(
        "version",
        format!(
            "Invalid or missing version in {}: must be a valid semver string (e.g., 1.2.3)",
            file
        ),
    )
}

/// Configuration snapshot for one tagging attempt.
#[derive(Debug, Clone)]
pub struct TagConfig {
    pub version_file: String,
    pub dry_run: bool,
}

impl TagConfig {
    pub fn from_inputs() -> Result<Self> {
        Ok(Self {
            version_file: inputs::get("version-file")?,
            dry_run: inputs::get_bool("dry-run")?,
        })
    }
}

/// Read the version file and return its validated `version` field.
pub fn load_version(path: &str) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorCode::InternalIoError,
            format!("Failed to read {}: {}", path, e),
            serde_json::json!({ "path": path, "error": e.to_string() }),
        )
    })?;

    let data: Value = serde_json::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::InternalJsonError,
            format!("Invalid JSON in {}: {}", path, e),
            serde_json::json!({ "path": path, "error": e.to_string() }),
        )
    })?;

    match data.get("version").and_then(Value::as_str) {
        Some(version) if version_regex().is_match(version) => Ok(version.to_string()),
        _ => Err(invalid_version_error(path)),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub tagged: bool,
    pub pushed: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Tag and push a release from the configured version file.
///
/// Always completes; failures surface on the error channel and in the
/// outcome's `error` field.
pub fn tag_release(config: &TagConfig, git: &dyn GitRunner) -> TagOutcome {
    match try_tag(config, git) {
        Ok(outcome) => outcome,
        Err(err) => {
            workflow::error(&format!("Tag release error: {}", err));
            TagOutcome {
                version: None,
                tagged: false,
                pushed: false,
                dry_run: config.dry_run,
                error: Some(err.message),
            }
        }
    }
}

fn try_tag(config: &TagConfig, git: &dyn GitRunner) -> Result<TagOutcome> {
    let version = load_version(&config.version_file)?;

    git.run(&["config", "--global", "user.name", GIT_USER_NAME])?;
    git.run(&["config", "--global", "user.email", GIT_USER_EMAIL])?;

    if config.dry_run {
        workflow::info("Dry run enabled, skipped git tag and push");
        return Ok(TagOutcome {
            version: Some(version),
            tagged: false,
            pushed: false,
            dry_run: true,
            error: None,
        });
    }

    git.run(&["tag", &version])?;
    git.run(&["push", "origin", &version])?;
    workflow::info(&format!("Git repository tagged with {} version", version));

    Ok(TagOutcome {
        version: Some(version),
        tagged: true,
        pushed: true,
        dry_run: false,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    struct RecordingGit {
        calls: RefCell<Vec<Vec<String>>>,
        fail_from: Option<usize>,
    }

    impl RecordingGit {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_from: None,
            }
        }

        fn failing_from(index: usize) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_from: Some(index),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl GitRunner for RecordingGit {
        fn run(&self, args: &[&str]) -> Result<String> {
            let index = self.calls.borrow().len();
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            if self.fail_from.is_some_and(|from| index >= from) {
                return Err(Error::git_command_failed("git error"));
            }
            Ok(String::new())
        }
    }

    fn version_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write version file");
        file
    }

    fn config_for(file: &tempfile::NamedTempFile, dry_run: bool) -> TagConfig {
        TagConfig {
            version_file: file.path().to_string_lossy().to_string(),
            dry_run,
        }
    }

    #[test]
    fn tags_and_pushes_in_order_when_version_is_valid() {
        let file = version_file(r#"{"version":"1.2.3"}"#);
        let git = RecordingGit::new();

        let outcome = tag_release(&config_for(&file, false), &git);

        assert_eq!(
            git.calls(),
            vec![
                vec!["config", "--global", "user.name", GIT_USER_NAME],
                vec!["config", "--global", "user.email", GIT_USER_EMAIL],
                vec!["tag", "1.2.3"],
                vec!["push", "origin", "1.2.3"],
            ]
            .into_iter()
            .map(|c| c.into_iter().map(String::from).collect::<Vec<_>>())
            .collect::<Vec<_>>()
        );
        assert!(outcome.tagged);
        assert!(outcome.pushed);
        assert_eq!(outcome.version.as_deref(), Some("1.2.3"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn dry_run_configures_identity_but_skips_tag_and_push() {
        let file = version_file(r#"{"version":"1.2.3"}"#);
        let git = RecordingGit::new();

        let outcome = tag_release(&config_for(&file, true), &git);

        assert_eq!(git.calls().len(), 2);
        assert!(!outcome.tagged);
        assert!(!outcome.pushed);
        assert!(outcome.dry_run);
    }

    #[test]
    fn invalid_version_issues_no_git_commands_and_completes() {
        let file = version_file(r#"{"version":"not-semver"}"#);
        let git = RecordingGit::new();

        let outcome = tag_release(&config_for(&file, false), &git);

        assert!(git.calls().is_empty());
        assert!(!outcome.tagged);
        let error = outcome.error.expect("validation error recorded");
        assert!(error.contains("Invalid or missing version"));
        assert!(error.contains("must be a valid semver string"));
    }

    #[test]
    fn missing_version_field_is_rejected() {
        let file = version_file(r#"{"name":"orders-api"}"#);
        let git = RecordingGit::new();

        let outcome = tag_release(&config_for(&file, false), &git);

        assert!(git.calls().is_empty());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn prerelease_versions_are_rejected() {
        for bad in ["1.2.3-rc.1", "1.2", "v1.2.3", "1.2.3.4", ""] {
            let file = version_file(&format!(r#"{{"version":"{}"}}"#, bad));
            let git = RecordingGit::new();
            let outcome = tag_release(&config_for(&file, false), &git);
            assert!(git.calls().is_empty(), "no git calls for {:?}", bad);
            assert!(outcome.error.is_some(), "rejected {:?}", bad);
        }
    }

    #[test]
    fn git_failure_is_logged_and_swallowed() {
        let file = version_file(r#"{"version":"1.2.3"}"#);
        // First command (config user.name) fails.
        let git = RecordingGit::failing_from(0);

        let outcome = tag_release(&config_for(&file, false), &git);

        assert!(!outcome.tagged);
        assert_eq!(outcome.error.as_deref(), Some("git error"));
    }

    #[test]
    fn push_failure_after_tag_is_swallowed() {
        let file = version_file(r#"{"version":"1.2.3"}"#);
        let git = RecordingGit::failing_from(3);

        let outcome = tag_release(&config_for(&file, false), &git);

        assert_eq!(git.calls().len(), 4);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn unreadable_file_is_swallowed() {
        let config = TagConfig {
            version_file: "/definitely/not/a/file.json".to_string(),
            dry_run: false,
        };
        let git = RecordingGit::new();

        let outcome = tag_release(&config, &git);

        assert!(git.calls().is_empty());
        assert!(outcome.error.unwrap().contains("Failed to read"));
    }
}
