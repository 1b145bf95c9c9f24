//! Step keyword normalization.
//!
//! A leading keyword (Given/When/Then) that repeats the previous leading
//! keyword is rewritten to `And`. Continuation steps (`And`, `But`, `*`) never
//! reset the previous leading keyword.
use crate::catalog::{location_string, Catalog};
use crate::gherkin::{Step, StepKeyword};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordEdit {
    pub line: usize,
    pub keyword: StepKeyword,
}

/// Edits for one document, sorted by line with no line repeated.
#[derive(Debug, Clone)]
pub struct DocumentEdits {
    pub document_path: PathBuf,
    pub edits: Vec<KeywordEdit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedEdit {
    pub location: String,
    pub keyword: StepKeyword,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeReport {
    pub edits: Vec<AppliedEdit>,
    pub documents: Vec<PathBuf>,
}

/// Lines in `steps` whose leading keyword repeats the previous one.
pub fn keyword_edits(steps: &[Step]) -> Vec<KeywordEdit> {
    let mut last_leading: Option<StepKeyword> = None;
    let mut edits = Vec::new();
    for step in steps {
        if !step.keyword.is_leading() {
            continue;
        }
        if last_leading == Some(step.keyword) {
            tracing::debug!(line = step.line, step = %step.text, "repeated step keyword");
            edits.push(KeywordEdit {
                line: step.line,
                keyword: step.keyword,
            });
        }
        last_leading = Some(step.keyword);
    }
    edits
}

/// Collect edits per document in catalog order.
///
/// Background steps are checked once per document even though every scenario
/// of the document refers to them; outline rows sharing steps collapse to one
/// edit per line.
pub fn plan_keyword_edits(catalog: &Catalog) -> Vec<DocumentEdits> {
    let mut order: Vec<PathBuf> = Vec::new();
    let mut by_document: HashMap<PathBuf, BTreeMap<usize, StepKeyword>> = HashMap::new();
    for record in catalog.records() {
        let first_visit = !by_document.contains_key(&record.document_path);
        let lines = by_document
            .entry(record.document_path.clone())
            .or_insert_with(|| {
                order.push(record.document_path.clone());
                BTreeMap::new()
            });
        let mut found = keyword_edits(&record.steps);
        if first_visit {
            if let Some(background) = record.background.and_then(|id| catalog.background(id)) {
                tracing::debug!(
                    path = %background.document_path.display(),
                    line = background.line,
                    "checking background steps"
                );
                found.extend(keyword_edits(&background.steps));
            }
        }
        for edit in found {
            lines.insert(edit.line, edit.keyword);
        }
    }
    order
        .into_iter()
        .filter_map(|document_path| {
            let lines = by_document.remove(&document_path)?;
            if lines.is_empty() {
                return None;
            }
            let edits = lines
                .into_iter()
                .map(|(line, keyword)| KeywordEdit { line, keyword })
                .collect();
            Some(DocumentEdits {
                document_path,
                edits,
            })
        })
        .collect()
}

/// Replace the first occurrence of each edit's keyword on its line with `And`.
pub fn apply_keyword_edits(text: &str, edits: &[KeywordEdit]) -> Result<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for edit in edits {
        let line = edit
            .line
            .checked_sub(1)
            .and_then(|idx| lines.get_mut(idx))
            .ok_or_else(|| anyhow!("line {} is out of range", edit.line))?;
        *line = line.replacen(edit.keyword.as_str(), StepKeyword::And.as_str(), 1);
    }
    Ok(lines.join("\n"))
}

/// Plan and apply keyword edits, writing each affected document once.
pub fn normalize_documents(catalog: &Catalog) -> Result<NormalizeReport> {
    let mut report = NormalizeReport::default();
    for document in plan_keyword_edits(catalog) {
        let path = &document.document_path;
        let text = fs::read_to_string(path)
            .with_context(|| format!("read feature file {}", path.display()))?;
        let updated = apply_keyword_edits(&text, &document.edits)
            .with_context(|| format!("edit feature file {}", path.display()))?;
        fs::write(path, updated.as_bytes())
            .with_context(|| format!("write feature file {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            edits = document.edits.len(),
            "normalized step keywords"
        );
        report
            .edits
            .extend(document.edits.iter().map(|edit| AppliedEdit {
                location: location_string(path, edit.line),
                keyword: edit.keyword,
            }));
        report.documents.push(document.document_path);
    }
    Ok(report)
}
