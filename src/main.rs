use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod config;
mod diff;
mod gherkin;
mod normalize;
mod rewrite;
mod snapshot;
mod summary;
mod workflow;

use cli::RootArgs;
use config::ToolConfig;
use snapshot::FileSnapshotStore;
use workflow::{run_command, RunContext};

/// Environment variable holding the stderr log filter.
const LOG_ENV: &str = "BDDKIT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = RootArgs::parse();
    let config = ToolConfig::from_env()?;
    tracing::debug!(
        features = %config.features_path.display(),
        snapshot = %args.snapshot.display(),
        "resolved configuration"
    );

    let mut store = FileSnapshotStore::new(args.snapshot.clone());
    let mut ctx = RunContext {
        config: &config,
        store: &mut store,
        force: args.force,
    };
    let report = run_command(args.command, &mut ctx)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize command report")?;
        println!("{text}");
    } else {
        summary::print_report(&report);
    }

    let failures = u8::try_from(report.failure_count()).unwrap_or(u8::MAX);
    Ok(ExitCode::from(failures))
}
