//! Environment configuration.
//!
//! Values are read once in `main` and passed down; nothing else touches the
//! process environment.
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const FEATURES_PATH_VAR: &str = "FEATURES_PATH";
pub const EXPECTED_FAILURES_DIR_VAR: &str = "EXPECTED_FAILURES_DIR";
pub const EXPECTED_FAILURES_PREFIX_VAR: &str = "EXPECTED_FAILURES_PREFIX";

/// Reference documents are the files whose names start with this prefix.
pub const DEFAULT_EXPECTED_FAILURES_PREFIX: &str = "expected-failures";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Canonical feature file or directory.
    pub features_path: PathBuf,
    pub expected_failures_dir: Option<PathBuf>,
    pub expected_failures_prefix: String,
    /// The prefix came from the default rather than the environment.
    pub prefix_defaulted: bool,
}

impl ToolConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let raw = get(FEATURES_PATH_VAR)
            .ok_or_else(|| anyhow!("environment variable {FEATURES_PATH_VAR} must be set"))?;
        let features_path = PathBuf::from(&raw)
            .canonicalize()
            .with_context(|| format!("{FEATURES_PATH_VAR} {raw} does not exist"))?;

        let expected_failures_dir = get(EXPECTED_FAILURES_DIR_VAR).map(PathBuf::from);
        let (expected_failures_prefix, prefix_defaulted) = match get(EXPECTED_FAILURES_PREFIX_VAR)
        {
            Some(prefix) => (prefix, false),
            None => (DEFAULT_EXPECTED_FAILURES_PREFIX.to_string(), true),
        };

        Ok(Self {
            features_path,
            expected_failures_dir,
            expected_failures_prefix,
            prefix_defaulted,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
