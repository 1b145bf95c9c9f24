//! `shift`: match the catalog against the snapshot and rewrite citations of
//! moved scenarios in the reference documents.
use super::{load_snapshot, CommandReport, FailureStep, RunContext};
use crate::catalog::Catalog;
use crate::config::{EXPECTED_FAILURES_DIR_VAR, EXPECTED_FAILURES_PREFIX_VAR};
use crate::diff::detect_shifts;
use crate::rewrite::rewrite_reference_dir;

pub(super) fn run_shift(catalog: &Catalog, ctx: &RunContext<'_>, report: &mut CommandReport) {
    let has_duplicates = report.check_duplicates(catalog);
    let Some(old) = load_snapshot(ctx, report) else {
        return;
    };
    let detected = detect_shifts(old.records(), catalog.records());
    let shifts = detected.shifts.clone();
    report.shifts = Some(detected);

    if has_duplicates && !ctx.force {
        report.note("reference documents were not updated because duplicate scenarios were found (pass --force to update them anyway)");
        return;
    }
    let Some(dir) = ctx.config.expected_failures_dir.as_deref() else {
        report.note(format!(
            "{EXPECTED_FAILURES_DIR_VAR} is not set; reference documents were not updated"
        ));
        return;
    };
    let prefix = &ctx.config.expected_failures_prefix;
    if ctx.config.prefix_defaulted {
        report.note(format!(
            "{EXPECTED_FAILURES_PREFIX_VAR} is not set; using {prefix:?} as the reference document prefix"
        ));
    }
    match rewrite_reference_dir(dir, prefix, &shifts) {
        Ok(updates) => report.references = Some(updates),
        Err(err) => report.fail_with(FailureStep::ReferenceRewrite, &err),
    }
}
