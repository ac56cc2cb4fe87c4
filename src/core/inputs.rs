//! Input resolution from the invoking pipeline.
//!
//! The CI runner exposes action inputs as `INPUT_<NAME>` environment
//! variables, with the name upper-cased and spaces mapped to underscores.
//! All configuration flows through here exactly once, at action start.

use crate::error::{Error, Result};

/// Map an input name to its environment variable key.
pub fn env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn raw(name: &str) -> Option<String> {
    std::env::var(env_key(name)).ok()
}

/// Resolve a required input. Fails fast when absent or empty.
pub fn get(name: &str) -> Result<String> {
    match raw(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::input_missing(name)
            .with_hint(format!("Provide it as the {} environment variable", env_key(name)))),
    }
}

/// Resolve an optional input. Absent or empty resolves to None.
pub fn get_optional(name: &str) -> Option<String> {
    raw(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a boolean input.
///
/// Accepts the YAML 1.2 core forms the runner emits: `true`/`True`/`TRUE`
/// and `false`/`False`/`FALSE`. An absent or empty input resolves to false;
/// anything else is an invalid value.
pub fn get_bool(name: &str) -> Result<bool> {
    let value = match get_optional(name) {
        Some(v) => v,
        None => return Ok(false),
    };

    match value.as_str() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(Error::input_invalid_value(
            name,
            Some(other.to_string()),
            "expected true or false",
        )),
    }
}

/// Resolve an optional numeric input (milliseconds and the like).
pub fn get_u64(name: &str) -> Result<Option<u64>> {
    match get_optional(name) {
        None => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| {
            Error::input_invalid_value(name, Some(value.clone()), "expected a whole number")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Input resolution reads process environment; serialize the tests that
    // mutate it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn env_key_maps_names_like_the_runner() {
        assert_eq!(env_key("start-time"), "INPUT_START-TIME");
        assert_eq!(env_key("workflow name"), "INPUT_WORKFLOW_NAME");
        assert_eq!(env_key("dry-run"), "INPUT_DRY-RUN");
    }

    #[test]
    fn get_returns_trimmed_value() {
        let _guard = lock();
        std::env::set_var("INPUT_APP-NAME", "  orders-api  ");
        assert_eq!(get("app-name").unwrap(), "orders-api");
        std::env::remove_var("INPUT_APP-NAME");
    }

    #[test]
    fn get_fails_fast_when_missing() {
        let _guard = lock();
        std::env::remove_var("INPUT_PROM-PUSH-TOKEN");
        let err = get("prom-push-token").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InputMissing);
        assert!(err.message.contains("prom-push-token"));
    }

    #[test]
    fn get_treats_whitespace_as_missing() {
        let _guard = lock();
        std::env::set_var("INPUT_SERVICE-URL", "   ");
        assert!(get("service-url").is_err());
        std::env::remove_var("INPUT_SERVICE-URL");
    }

    #[test]
    fn get_bool_defaults_to_false_when_absent() {
        let _guard = lock();
        std::env::remove_var("INPUT_DRY-RUN");
        assert!(!get_bool("dry-run").unwrap());
    }

    #[test]
    fn get_bool_parses_runner_forms() {
        let _guard = lock();
        for (raw, expected) in [("true", true), ("True", true), ("FALSE", false)] {
            std::env::set_var("INPUT_DRY-RUN", raw);
            assert_eq!(get_bool("dry-run").unwrap(), expected);
        }
        std::env::remove_var("INPUT_DRY-RUN");
    }

    #[test]
    fn get_bool_rejects_other_values() {
        let _guard = lock();
        std::env::set_var("INPUT_DRY-RUN", "yes");
        let err = get_bool("dry-run").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InputInvalidValue);
        std::env::remove_var("INPUT_DRY-RUN");
    }

    #[test]
    fn get_u64_parses_timeouts() {
        let _guard = lock();
        std::env::set_var("INPUT_LOKI-TIMEOUT", "10000");
        assert_eq!(get_u64("loki-timeout").unwrap(), Some(10000));
        std::env::set_var("INPUT_LOKI-TIMEOUT", "soon");
        assert!(get_u64("loki-timeout").is_err());
        std::env::remove_var("INPUT_LOKI-TIMEOUT");
        assert_eq!(get_u64("loki-timeout").unwrap(), None);
    }
}
