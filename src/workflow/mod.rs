//! Command orchestration.
//!
//! Every command builds a fresh catalog and records each failed step in its
//! [`CommandReport`]. Failed steps are counted rather than raised; only
//! configuration and document parse errors abort a command.
mod cache;
mod check_and;
mod inspect;
mod scan;
mod shift;

use crate::catalog::{build_catalog, Catalog};
use crate::cli::Command;
use crate::config::ToolConfig;
use crate::diff::{inspect_duplicates, DuplicateReport, ScanReport, ShiftReport};
use crate::normalize::NormalizeReport;
use crate::rewrite::ReferenceUpdate;
use crate::snapshot::SnapshotStore;
use anyhow::Result;
use serde::Serialize;

/// Inputs shared by every command for one invocation.
pub struct RunContext<'a> {
    pub config: &'a ToolConfig,
    pub store: &'a mut dyn SnapshotStore,
    /// Mutate the snapshot or reference documents despite duplicates.
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStep {
    Duplicates,
    SnapshotUnavailable,
    SnapshotWrite,
    ReferenceRewrite,
    DocumentRewrite,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub step: FailureStep,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub location: String,
    pub records: usize,
}

/// Everything one command found or changed.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: &'static str,
    pub documents: usize,
    pub scenarios: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<DuplicateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shifts: Option<ShiftReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<NormalizeReport>,
    pub notes: Vec<String>,
    pub failures: Vec<Failure>,
}

impl CommandReport {
    fn new(command: Command, catalog: &Catalog) -> Self {
        Self {
            command: command.name(),
            documents: catalog.document_count(),
            scenarios: catalog.len(),
            duplicates: None,
            snapshot: None,
            shifts: None,
            references: None,
            scan: None,
            normalized: None,
            notes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// One unit per failed step; this is the process exit status.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    fn fail(&mut self, step: FailureStep, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?step, %message, "step failed");
        self.failures.push(Failure { step, message });
    }

    fn fail_with(&mut self, step: FailureStep, err: &anyhow::Error) {
        self.fail(step, error_chain_message(err));
    }

    fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    /// Run duplicate inspection over `catalog`; returns whether any were found.
    fn check_duplicates(&mut self, catalog: &Catalog) -> bool {
        let duplicates = inspect_duplicates(catalog.records());
        let found = duplicates.has_duplicates;
        if found {
            self.fail(
                FailureStep::Duplicates,
                format!(
                    "{} duplicate scenario(s) found",
                    duplicates.collisions.len()
                ),
            );
        }
        self.duplicates = Some(duplicates);
        found
    }
}

/// Build the catalog and run `command` against it.
pub fn run_command(command: Command, ctx: &mut RunContext<'_>) -> Result<CommandReport> {
    let catalog = build_catalog(&ctx.config.features_path)?;
    let mut report = CommandReport::new(command, &catalog);
    match command {
        Command::Inspect => inspect::run_inspect(&catalog, &mut report),
        Command::Cache => cache::run_cache(&catalog, ctx, &mut report),
        Command::Shift => shift::run_shift(&catalog, ctx, &mut report),
        Command::Scan => scan::run_scan(&catalog, ctx, &mut report),
        Command::CheckAnd => check_and::run_check_and(&catalog, &mut report),
    }
    tracing::info!(
        command = report.command,
        failures = report.failure_count(),
        "command finished"
    );
    Ok(report)
}

/// Load the previous catalog, recording a failure when it is unavailable.
fn load_snapshot(ctx: &RunContext<'_>, report: &mut CommandReport) -> Option<Catalog> {
    match ctx.store.load() {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            report.fail_with(FailureStep::SnapshotUnavailable, &err);
            None
        }
    }
}

fn error_chain_message(err: &anyhow::Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
