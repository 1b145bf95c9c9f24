//! `check-and`: rewrite repeated leading step keywords to `And`.
use super::{CommandReport, FailureStep};
use crate::catalog::Catalog;
use crate::normalize::normalize_documents;

pub(super) fn run_check_and(catalog: &Catalog, report: &mut CommandReport) {
    match normalize_documents(catalog) {
        Ok(normalized) => report.normalized = Some(normalized),
        Err(err) => report.fail_with(FailureStep::DocumentRewrite, &err),
    }
}
