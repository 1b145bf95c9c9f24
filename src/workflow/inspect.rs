//! `inspect`: duplicate check only.
use super::CommandReport;
use crate::catalog::Catalog;

pub(super) fn run_inspect(catalog: &Catalog, report: &mut CommandReport) {
    report.check_duplicates(catalog);
}
