//! Line-oriented Gherkin reader.
//!
//! A malformed document is an error naming the path and line; callers never
//! see a partially parsed document.
use super::{
    Background, ExamplesBlock, ExamplesRow, FeatureDocument, ScenarioDefinition, Step, StepKeyword,
};
use anyhow::{anyhow, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(
            r"^(Feature|Background|Scenario Outline|Scenario Template|Scenario|Examples|Example|Scenarios|Rule):(.*)$",
        )
        .expect("compile gherkin header regex")
    })
}

fn step_regex() -> &'static Regex {
    static STEP: OnceLock<Regex> = OnceLock::new();
    STEP.get_or_init(|| {
        Regex::new(r"^(Given|When|Then|And|But|\*)\s+(.*)$").expect("compile gherkin step regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Feature,
    Background,
    Scenario,
    Examples,
}

struct OpenDocString {
    delimiter: &'static str,
    line: usize,
}

struct Parser<'a> {
    path: &'a Path,
    title: Option<String>,
    background: Option<Background>,
    scenarios: Vec<ScenarioDefinition>,
    section: Section,
    // free text directly after a header is description
    description_open: bool,
    // tables and doc strings attach to the preceding step
    after_step: bool,
    examples_header_pending: bool,
    doc_string: Option<OpenDocString>,
}

/// Parse one `.feature` document.
pub fn parse_feature(path: &Path, text: &str) -> Result<FeatureDocument> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = Parser::new(path);
    for (idx, raw) in text.lines().enumerate() {
        parser.line(idx + 1, raw)?;
    }
    parser.finish()
}

fn parse_error(path: &Path, line: usize, message: &str) -> anyhow::Error {
    anyhow!("{}:{line}: {message}", path.display())
}

impl<'a> Parser<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            title: None,
            background: None,
            scenarios: Vec::new(),
            section: Section::Preamble,
            description_open: false,
            after_step: false,
            examples_header_pending: false,
            doc_string: None,
        }
    }

    fn line(&mut self, line: usize, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        if let Some(open) = &self.doc_string {
            if trimmed.starts_with(open.delimiter) {
                self.doc_string = None;
                self.after_step = false;
            }
            return Ok(());
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('@') {
            return Ok(());
        }
        if let Some(caps) = header_regex().captures(trimmed) {
            return self.header(line, &caps[1], caps[2].trim());
        }
        if let Some(caps) = step_regex().captures(trimmed) {
            let keyword = StepKeyword::from_token(&caps[1])
                .ok_or_else(|| parse_error(self.path, line, "unknown step keyword"))?;
            return self.step(line, keyword, caps[2].trim());
        }
        if trimmed.starts_with('|') {
            return self.table_row(line, trimmed);
        }
        if let Some(delimiter) = doc_string_delimiter(trimmed) {
            if self.after_step {
                self.doc_string = Some(OpenDocString { delimiter, line });
                return Ok(());
            }
        }
        if self.description_open {
            return Ok(());
        }
        Err(parse_error(
            self.path,
            line,
            &format!("unexpected text {trimmed:?}"),
        ))
    }

    fn header(&mut self, line: usize, keyword: &str, title: &str) -> Result<()> {
        let path = self.path;
        if keyword != "Feature" && self.title.is_none() {
            return Err(parse_error(
                path,
                line,
                &format!("{keyword}: appears before Feature:"),
            ));
        }
        match keyword {
            "Feature" => {
                if self.title.is_some() {
                    return Err(parse_error(path, line, "only one Feature: per document"));
                }
                self.title = Some(title.to_string());
                self.section = Section::Feature;
            }
            "Background" => {
                if !self.scenarios.is_empty() {
                    return Err(parse_error(
                        path,
                        line,
                        "Background: must come before the first scenario",
                    ));
                }
                if self.background.is_some() {
                    return Err(parse_error(path, line, "only one Background: per document"));
                }
                self.background = Some(Background {
                    line,
                    steps: Vec::new(),
                });
                self.section = Section::Background;
            }
            "Scenario" | "Example" => {
                self.scenarios.push(ScenarioDefinition::Plain {
                    line,
                    title: title.to_string(),
                    steps: Vec::new(),
                });
                self.section = Section::Scenario;
            }
            "Scenario Outline" | "Scenario Template" => {
                self.scenarios.push(ScenarioDefinition::Outline {
                    line,
                    title: title.to_string(),
                    steps: Vec::new(),
                    examples: Vec::new(),
                });
                self.section = Section::Scenario;
            }
            "Examples" | "Scenarios" => {
                let in_outline = matches!(self.section, Section::Scenario | Section::Examples);
                match self.scenarios.last_mut() {
                    Some(ScenarioDefinition::Outline { examples, .. }) if in_outline => {
                        examples.push(ExamplesBlock {
                            line,
                            header: Vec::new(),
                            rows: Vec::new(),
                        });
                    }
                    _ => {
                        return Err(parse_error(
                            path,
                            line,
                            &format!("{keyword}: outside of a Scenario Outline"),
                        ));
                    }
                }
                self.examples_header_pending = true;
                self.section = Section::Examples;
            }
            _ => {
                return Err(parse_error(
                    path,
                    line,
                    &format!("{keyword}: sections are not supported"),
                ));
            }
        }
        self.description_open = true;
        self.after_step = false;
        Ok(())
    }

    fn step(&mut self, line: usize, keyword: StepKeyword, text: &str) -> Result<()> {
        let path = self.path;
        let steps = match self.section {
            Section::Background => self.background.as_mut().map(|bg| &mut bg.steps),
            Section::Scenario => self.scenarios.last_mut().map(|s| s.steps_mut()),
            Section::Preamble | Section::Feature | Section::Examples => None,
        };
        let Some(steps) = steps else {
            return Err(parse_error(
                path,
                line,
                "step outside of a Background or Scenario",
            ));
        };
        steps.push(Step {
            keyword,
            text: text.to_string(),
            line,
        });
        self.description_open = false;
        self.after_step = true;
        Ok(())
    }

    fn table_row(&mut self, line: usize, row: &str) -> Result<()> {
        if self.after_step {
            return Ok(());
        }
        let path = self.path;
        if self.section != Section::Examples {
            return Err(parse_error(
                path,
                line,
                "table row outside of a step or Examples block",
            ));
        }
        let block = match self.scenarios.last_mut() {
            Some(ScenarioDefinition::Outline { examples, .. }) => examples.last_mut(),
            _ => None,
        };
        let Some(block) = block else {
            return Err(parse_error(path, line, "table row without an Examples block"));
        };
        let cells = split_table_row(row);
        if self.examples_header_pending {
            block.header = cells;
            self.examples_header_pending = false;
        } else {
            if cells.len() != block.header.len() {
                return Err(parse_error(
                    path,
                    line,
                    &format!(
                        "examples row has {} cells but the header has {}",
                        cells.len(),
                        block.header.len()
                    ),
                ));
            }
            block.rows.push(ExamplesRow { line, cells });
        }
        self.description_open = false;
        Ok(())
    }

    fn finish(self) -> Result<FeatureDocument> {
        if let Some(open) = self.doc_string {
            return Err(parse_error(self.path, open.line, "unterminated doc string"));
        }
        Ok(FeatureDocument {
            path: self.path.to_path_buf(),
            title: self.title.unwrap_or_default(),
            background: self.background,
            scenarios: self.scenarios,
        })
    }
}

fn doc_string_delimiter(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("\"\"\"") {
        Some("\"\"\"")
    } else if trimmed.starts_with("```") {
        Some("```")
    } else {
        None
    }
}

/// Split `| a | b \| c |` into trimmed cells, honoring `\|`, `\\` and `\n`.
fn split_table_row(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = row.strip_prefix('|').unwrap_or(row).chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('|') => current.push('|'),
                Some('n') => current.push('\n'),
                Some('\\') => current.push('\\'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
