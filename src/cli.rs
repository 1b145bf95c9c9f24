//! CLI argument parsing.
//!
//! Paths to feature and reference documents come from the environment (see
//! `config`); flags only cover the snapshot location and output format.
use crate::snapshot::DEFAULT_SNAPSHOT_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bddkit",
    version,
    about = "Keep expected-failure references in sync with moving feature files",
    after_help = "Environment:\n  FEATURES_PATH             Feature file or directory (required)\n  EXPECTED_FAILURES_DIR     Directory holding reference documents (shift)\n  EXPECTED_FAILURES_PREFIX  Reference document name prefix (default: expected-failures)\n  BDDKIT_LOG                Log filter for stderr diagnostics (default: warn)\n\nInstructions:\n  Check out the commit the reference documents were written against, then run\n  `inspect` and `cache`. Check out the latest version of the project and run\n  `shift` to update the reference documents, or `scan` to list new and removed\n  scenarios.\n\nExamples:\n  FEATURES_PATH=tests/acceptance/features bddkit cache\n  FEATURES_PATH=tests/acceptance/features EXPECTED_FAILURES_DIR=tests bddkit shift\n  FEATURES_PATH=tests/acceptance/features bddkit scan --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Snapshot file written by `cache` and read by `shift` and `scan`
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Write the snapshot or reference documents even when duplicates are found
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Check the feature documents for duplicate scenarios
    Inspect,
    /// Check for duplicates and snapshot the current scenarios
    Cache,
    /// Rewrite reference documents for scenarios that moved since the snapshot
    Shift,
    /// List scenarios added or removed since the snapshot
    Scan,
    /// Replace repeated Given/When/Then step keywords with And
    CheckAnd,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Self::Inspect => "inspect",
            Self::Cache => "cache",
            Self::Shift => "shift",
            Self::Scan => "scan",
            Self::CheckAnd => "check-and",
        }
    }
}
