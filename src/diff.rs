//! Catalog diffing: duplicates, shifts, and added/removed scenarios.
//!
//! All three passes use the same identity rule and resolve ties to the first
//! matching record in catalog order. Duplicate inspection has to come back
//! clean before shift or scan results can be attributed to the right record.
use crate::catalog::{IdentityIndex, ScenarioRecord};
use serde::Serialize;

/// A scenario that kept its identity but moved to another line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub old: String,
    pub new: String,
}

impl Shift {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Two physical records sharing one identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub title: String,
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateReport {
    pub has_duplicates: bool,
    pub collisions: Vec<DuplicatePair>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ShiftReport {
    /// Locations of matched records that did not move.
    pub unchanged: Vec<String>,
    pub shifts: Vec<Shift>,
    /// Locations of new records with no match in the snapshot.
    pub added: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Find records whose identity is already taken by an earlier record.
pub fn inspect_duplicates(records: &[ScenarioRecord]) -> DuplicateReport {
    let index = IdentityIndex::new(records);
    let mut report = DuplicateReport::default();
    for record in records {
        let Some(first) = index.first_match(record) else {
            continue;
        };
        if !std::ptr::eq(first, record) {
            report.collisions.push(DuplicatePair {
                title: record.title.clone(),
                first: first.location(),
                second: record.location(),
            });
        }
    }
    report.has_duplicates = !report.collisions.is_empty();
    report
}

/// Classify every record of `new` against the snapshot `old`.
pub fn detect_shifts(old: &[ScenarioRecord], new: &[ScenarioRecord]) -> ShiftReport {
    let index = IdentityIndex::new(old);
    let mut report = ShiftReport::default();
    for record in new {
        match index.first_match(record) {
            Some(previous) if previous.line_number == record.line_number => {
                report.unchanged.push(record.location());
            }
            Some(previous) => {
                report
                    .shifts
                    .push(Shift::new(previous.location(), record.location()));
            }
            None => report.added.push(record.location()),
        }
    }
    tracing::debug!(
        unchanged = report.unchanged.len(),
        shifted = report.shifts.len(),
        added = report.added.len(),
        "detected shifts"
    );
    report
}

/// Identities present on only one side; line numbers are ignored.
pub fn scan(old: &[ScenarioRecord], new: &[ScenarioRecord]) -> ScanReport {
    let old_index = IdentityIndex::new(old);
    let new_index = IdentityIndex::new(new);
    ScanReport {
        added: new
            .iter()
            .filter(|record| !old_index.contains(record))
            .map(ScenarioRecord::location)
            .collect(),
        removed: old
            .iter()
            .filter(|record| !new_index.contains(record))
            .map(ScenarioRecord::location)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(line: usize) -> ScenarioRecord {
        ScenarioRecord::plain("/repo/auth/login.feature", line, "Login")
    }

    #[test]
    fn moved_scenario_emits_one_shift() {
        let old = vec![login(5)];
        let new = vec![login(9)];
        let report = detect_shifts(&old, &new);
        assert_eq!(
            report.shifts,
            vec![Shift::new("auth/login.feature:5", "auth/login.feature:9")]
        );
        assert!(report.unchanged.is_empty());
        assert!(report.added.is_empty());
    }

    #[test]
    fn unchanged_and_added_are_classified() {
        let old = vec![login(5)];
        let new = vec![
            login(5),
            ScenarioRecord::plain("/repo/auth/login.feature", 12, "Logout"),
        ];
        let report = detect_shifts(&old, &new);
        assert_eq!(report.unchanged, vec!["auth/login.feature:5"]);
        assert_eq!(report.added, vec!["auth/login.feature:12"]);
        assert!(report.shifts.is_empty());
    }

    #[test]
    fn shift_detection_accounts_for_every_record() {
        let old = vec![
            login(5),
            ScenarioRecord::plain("/repo/auth/login.feature", 10, "Remember me"),
            ScenarioRecord::outline("/repo/api/upload.feature", 20, "Upload", &["alice"]),
            ScenarioRecord::outline("/repo/api/upload.feature", 21, "Upload", &["bob"]),
        ];
        let new = vec![
            login(7),
            ScenarioRecord::outline("/repo/api/upload.feature", 20, "Upload", &["alice"]),
            ScenarioRecord::outline("/repo/api/upload.feature", 22, "Upload", &["carol"]),
            ScenarioRecord::plain("/repo/api/upload.feature", 30, "Chunked upload"),
        ];
        let shifted = detect_shifts(&old, &new);
        assert_eq!(
            shifted.unchanged.len() + shifted.shifts.len() + shifted.added.len(),
            new.len()
        );

        let scanned = scan(&old, &new);
        let matched_old = old.len() - scanned.removed.len();
        assert_eq!(matched_old, shifted.unchanged.len() + shifted.shifts.len());
        assert_eq!(
            scanned.removed,
            vec!["auth/login.feature:10", "api/upload.feature:21"]
        );
        assert_eq!(scanned.added, shifted.added);
    }

    #[test]
    fn duplicates_are_flagged_against_first_occurrence() {
        let records = vec![
            login(5),
            ScenarioRecord::plain("/repo/auth/login.feature", 8, "Other"),
            login(40),
        ];
        let report = inspect_duplicates(&records);
        assert!(report.has_duplicates);
        assert_eq!(
            report.collisions,
            vec![DuplicatePair {
                title: "Login".to_string(),
                first: "auth/login.feature:5".to_string(),
                second: "auth/login.feature:40".to_string(),
            }]
        );
    }

    #[test]
    fn distinct_identities_are_not_duplicates() {
        let records = vec![
            login(5),
            ScenarioRecord::plain("/repo/admin/login.feature", 5, "Login"),
            ScenarioRecord::outline("/repo/api/upload.feature", 20, "Upload", &["alice"]),
            ScenarioRecord::outline("/repo/api/upload.feature", 21, "Upload", &["bob"]),
        ];
        let report = inspect_duplicates(&records);
        assert!(!report.has_duplicates);
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn same_suite_key_in_different_trees_is_a_duplicate() {
        let records = vec![
            ScenarioRecord::plain("/repo/a/auth/login.feature", 5, "Login"),
            ScenarioRecord::plain("/repo/b/auth/login.feature", 5, "Login"),
        ];
        let report = inspect_duplicates(&records);
        assert!(report.has_duplicates);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].first, "auth/login.feature:5");
        assert_eq!(report.collisions[0].second, "auth/login.feature:5");
    }

    #[test]
    fn duplicate_outline_rows_are_flagged() {
        let records = vec![
            ScenarioRecord::outline("/repo/api/upload.feature", 20, "Upload", &["alice"]),
            ScenarioRecord::outline("/repo/api/upload.feature", 21, "Upload", &["alice"]),
        ];
        assert!(inspect_duplicates(&records).has_duplicates);
    }

    #[test]
    fn shifts_resolve_to_first_duplicate() {
        let old = vec![login(5), login(40)];
        let new = vec![login(41)];
        let report = detect_shifts(&old, &new);
        assert_eq!(
            report.shifts,
            vec![Shift::new("auth/login.feature:5", "auth/login.feature:41")]
        );
    }
}
