//! `scan`: scenarios added or removed since the snapshot.
use super::{load_snapshot, CommandReport, RunContext};
use crate::catalog::Catalog;
use crate::diff;

pub(super) fn run_scan(catalog: &Catalog, ctx: &RunContext<'_>, report: &mut CommandReport) {
    let Some(old) = load_snapshot(ctx, report) else {
        return;
    };
    report.scan = Some(diff::scan(old.records(), catalog.records()));
}
