//! `cache`: duplicate check, then snapshot the catalog.
use super::{CommandReport, FailureStep, RunContext, SnapshotSummary};
use crate::catalog::Catalog;

pub(super) fn run_cache(catalog: &Catalog, ctx: &mut RunContext<'_>, report: &mut CommandReport) {
    if report.check_duplicates(catalog) && !ctx.force {
        report.note("snapshot was not written because duplicate scenarios were found (pass --force to write it anyway)");
        return;
    }
    match ctx.store.save(catalog.records()) {
        Ok(()) => {
            report.snapshot = Some(SnapshotSummary {
                location: ctx.store.location(),
                records: catalog.len(),
            });
        }
        Err(err) => report.fail_with(FailureStep::SnapshotWrite, &err),
    }
}
