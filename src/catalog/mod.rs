//! Scenario catalog: flat identity records extracted from feature documents.
//!
//! A catalog is built fresh on every invocation and never mutated afterwards.
//! Records are the unit the diff engine compares and the snapshot persists;
//! steps and backgrounds ride along only for the keyword normalizer.
use crate::gherkin::{FeatureDocument, ScenarioDefinition, Step};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod build;
mod identity;

pub use build::build_catalog;
pub use identity::{location_string, IdentityIndex};

/// Scenario variant, resolved once when the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    Plain,
    /// One concrete instance of an outline, bound to a single Examples row.
    Outline { data_row: Vec<String> },
}

/// Index into [`Catalog::backgrounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackgroundId(usize);

/// Background steps owned by one document and observed by its scenarios.
#[derive(Debug, Clone)]
pub struct SharedBackground {
    pub document_path: PathBuf,
    pub line: usize,
    pub steps: Vec<Step>,
}

/// One scenario as found in one document at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    #[serde(flatten)]
    pub kind: ScenarioKind,
    pub line_number: usize,
    pub title: String,
    pub document_path: PathBuf,
    #[serde(skip)]
    pub steps: Vec<Step>,
    #[serde(skip)]
    pub background: Option<BackgroundId>,
}

impl ScenarioRecord {
    /// Bound Examples row; empty for plain scenarios.
    pub fn data_row(&self) -> &[String] {
        match &self.kind {
            ScenarioKind::Plain => &[],
            ScenarioKind::Outline { data_row } => data_row,
        }
    }

    /// `dir/file.feature:line` citation for this record.
    pub fn location(&self) -> String {
        location_string(&self.document_path, self.line_number)
    }
}

#[cfg(test)]
impl ScenarioRecord {
    pub fn plain(document_path: impl Into<PathBuf>, line_number: usize, title: &str) -> Self {
        Self {
            kind: ScenarioKind::Plain,
            line_number,
            title: title.to_string(),
            document_path: document_path.into(),
            steps: Vec::new(),
            background: None,
        }
    }

    pub fn outline(
        document_path: impl Into<PathBuf>,
        line_number: usize,
        title: &str,
        data_row: &[&str],
    ) -> Self {
        Self {
            kind: ScenarioKind::Outline {
                data_row: data_row.iter().map(|cell| cell.to_string()).collect(),
            },
            ..Self::plain(document_path, line_number, title)
        }
    }
}

/// Ordered scenario records plus the backgrounds they reference.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ScenarioRecord>,
    backgrounds: Vec<SharedBackground>,
}

impl Catalog {
    /// Catalog without backgrounds, as reconstructed from a snapshot.
    pub fn from_records(records: Vec<ScenarioRecord>) -> Self {
        Self {
            records,
            backgrounds: Vec::new(),
        }
    }

    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn background(&self, id: BackgroundId) -> Option<&SharedBackground> {
        self.backgrounds.get(id.0)
    }

    /// Append every scenario of `document` in document order.
    ///
    /// Outlines expand to one record per Examples row, cited at the row's line.
    pub fn push_document(&mut self, document: FeatureDocument) {
        let background = document.background.map(|background| {
            self.backgrounds.push(SharedBackground {
                document_path: document.path.clone(),
                line: background.line,
                steps: background.steps,
            });
            BackgroundId(self.backgrounds.len() - 1)
        });
        for scenario in document.scenarios {
            match scenario {
                ScenarioDefinition::Plain { line, title, steps } => self.records.push(ScenarioRecord {
                    kind: ScenarioKind::Plain,
                    line_number: line,
                    title,
                    document_path: document.path.clone(),
                    steps,
                    background,
                }),
                ScenarioDefinition::Outline {
                    line,
                    title,
                    steps,
                    examples,
                } => {
                    for block in examples.iter().filter(|block| block.rows.is_empty()) {
                        tracing::warn!(
                            path = %document.path.display(),
                            outline = line,
                            examples = block.line,
                            "examples table has no data rows"
                        );
                    }
                    for row in examples.into_iter().flat_map(|block| block.rows) {
                        self.records.push(ScenarioRecord {
                            kind: ScenarioKind::Outline {
                                data_row: row.cells,
                            },
                            line_number: row.line,
                            title: title.clone(),
                            document_path: document.path.clone(),
                            steps: steps.clone(),
                            background,
                        });
                    }
                }
            }
        }
    }

    /// Number of distinct documents contributing records.
    pub fn document_count(&self) -> usize {
        let mut last: Option<&Path> = None;
        let mut count = 0;
        for record in &self.records {
            if last != Some(record.document_path.as_path()) {
                count += 1;
                last = Some(record.document_path.as_path());
            }
        }
        count
    }
}
