//! Environment lookup.
//!
//! The pipeline reads environment variables through [`Environment`] so that
//! tests can supply a fixed set without touching the process environment.

use std::collections::HashMap;

/// Source of environment variables.
pub trait Environment: Send + Sync {
    /// Value of `key`, or `None` if it is not set. An empty value counts as set.
    fn var(&self, key: &str) -> Option<String>;

    /// Whether `key` is set at all.
    fn is_set(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_environment_lookup() {
        let env: HashMap<String, String> = [("ARGO_SERVER".to_string(), String::new())].into();
        assert!(env.is_set("ARGO_SERVER"));
        assert_eq!(env.var("ARGO_SERVER").as_deref(), Some(""));
        assert!(!env.is_set("ARGO_TOKEN"));
    }

    #[test]
    fn process_environment_missing_var() {
        assert!(ProcessEnv.var("ARGO_CLI_TEST_SURELY_UNSET_9F3A").is_none());
    }
}
