//! Gherkin document model.
//!
//! The reader keeps only what the catalog and the keyword normalizer consume:
//! scenario headings, outline example rows, and step keywords with their
//! source lines. Descriptions, tags, doc strings, and step tables are skipped.
use serde::Serialize;
use std::path::PathBuf;

mod parse;

pub use parse::parse_feature;

/// Keyword that opens a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
    Star,
}

impl StepKeyword {
    /// Keyword token exactly as it appears in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
            StepKeyword::Star => "*",
        }
    }

    /// Given/When/Then open a phase; the rest continue the previous one.
    pub fn is_leading(self) -> bool {
        matches!(
            self,
            StepKeyword::Given | StepKeyword::When | StepKeyword::Then
        )
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "Given" => Some(StepKeyword::Given),
            "When" => Some(StepKeyword::When),
            "Then" => Some(StepKeyword::Then),
            "And" => Some(StepKeyword::And),
            "But" => Some(StepKeyword::But),
            "*" => Some(StepKeyword::Star),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub keyword: StepKeyword,
    pub text: String,
    /// 1-based line of the step within its document.
    pub line: usize,
}

/// Shared setup steps run before every scenario of a document.
#[derive(Debug, Clone, Default)]
pub struct Background {
    pub line: usize,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct ExamplesRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// One `Examples:` table of a scenario outline.
#[derive(Debug, Clone)]
pub struct ExamplesBlock {
    pub line: usize,
    pub header: Vec<String>,
    pub rows: Vec<ExamplesRow>,
}

#[derive(Debug, Clone)]
pub enum ScenarioDefinition {
    Plain {
        line: usize,
        title: String,
        steps: Vec<Step>,
    },
    Outline {
        line: usize,
        title: String,
        steps: Vec<Step>,
        examples: Vec<ExamplesBlock>,
    },
}

impl ScenarioDefinition {
    fn steps_mut(&mut self) -> &mut Vec<Step> {
        match self {
            ScenarioDefinition::Plain { steps, .. } | ScenarioDefinition::Outline { steps, .. } => {
                steps
            }
        }
    }
}

#[cfg(test)]
impl ScenarioDefinition {
    pub fn title(&self) -> &str {
        match self {
            ScenarioDefinition::Plain { title, .. } | ScenarioDefinition::Outline { title, .. } => {
                title
            }
        }
    }

    pub fn steps(&self) -> &[Step] {
        match self {
            ScenarioDefinition::Plain { steps, .. } | ScenarioDefinition::Outline { steps, .. } => {
                steps
            }
        }
    }
}

/// A parsed `.feature` document.
#[derive(Debug, Clone)]
pub struct FeatureDocument {
    pub path: PathBuf,
    /// Feature title; empty for a document with no `Feature:` header.
    pub title: String,
    pub background: Option<Background>,
    pub scenarios: Vec<ScenarioDefinition>,
}
