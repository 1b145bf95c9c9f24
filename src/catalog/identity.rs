//! Scenario identity: which records denote "the same" scenario.
//!
//! Identity is `(title, test suite, data row)`. The line number is never part
//! of it, so a scenario keeps its identity when it moves within its file.
use super::ScenarioRecord;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

/// Borrowed identity key of a record.
///
/// Plain scenarios carry an empty data row, so comparing keys gives the
/// outline rule (title, suite and row must agree) when either side is an
/// outline, and the plain rule (title and suite) when both are plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    pub title: &'a str,
    pub directory: Option<&'a OsStr>,
    pub file_name: Option<&'a OsStr>,
    pub data_row: &'a [String],
}

impl<'a> IdentityKey<'a> {
    pub fn of(record: &'a ScenarioRecord) -> Self {
        let (directory, file_name) = suite_parts(&record.document_path);
        Self {
            title: &record.title,
            directory,
            file_name,
            data_row: record.data_row(),
        }
    }
}

fn suite_parts(path: &Path) -> (Option<&OsStr>, Option<&OsStr>) {
    let directory = path.parent().and_then(|parent| parent.file_name());
    (directory, path.file_name())
}

/// Parent directory name joined with the file name, e.g. `apiAuth/login.feature`.
///
/// Documents with the same name under same-named parent directories share a
/// suite key; reference documents cite locations at this granularity.
pub fn test_suite_key(path: &Path) -> String {
    let (directory, file_name) = suite_parts(path);
    let file_name = file_name.map(OsStr::to_string_lossy).unwrap_or_default();
    match directory {
        Some(directory) => format!("{}/{}", directory.to_string_lossy(), file_name),
        None => file_name.into_owned(),
    }
}

/// `suite:line` citation format shared with reference documents.
pub fn location_string(path: &Path, line_number: usize) -> String {
    format!("{}:{}", test_suite_key(path), line_number)
}

/// Whether two records denote the same scenario, ignoring line numbers.
#[cfg(test)]
pub fn matches(a: &ScenarioRecord, b: &ScenarioRecord) -> bool {
    IdentityKey::of(a) == IdentityKey::of(b)
}

/// First record per identity key, in catalog order.
///
/// Lookups return the same record a front-to-back scan comparing identity
/// keys would stop at, so duplicate keys always resolve to the first
/// occurrence.
pub struct IdentityIndex<'a> {
    first: HashMap<IdentityKey<'a>, &'a ScenarioRecord>,
}

impl<'a> IdentityIndex<'a> {
    pub fn new(records: &'a [ScenarioRecord]) -> Self {
        let mut first = HashMap::with_capacity(records.len());
        for record in records {
            first.entry(IdentityKey::of(record)).or_insert(record);
        }
        Self { first }
    }

    pub fn first_match(&self, record: &ScenarioRecord) -> Option<&'a ScenarioRecord> {
        self.first.get(&IdentityKey::of(record)).copied()
    }

    pub fn contains(&self, record: &ScenarioRecord) -> bool {
        self.first.contains_key(&IdentityKey::of(record))
    }
}
