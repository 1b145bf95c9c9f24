//! Catalog construction from a feature file or directory tree.
use super::Catalog;
use crate::gherkin;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const FEATURE_EXTENSION: &str = "feature";

/// Collect `*.feature` files under `root` in sorted path order.
///
/// A file root is returned as-is regardless of its extension.
pub fn collect_feature_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry.with_context(|| format!("read {}", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_feature_files(&path)?);
        } else if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(FEATURE_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every feature document under `root` into one catalog.
///
/// A single malformed document fails the whole build.
pub fn build_catalog(root: &Path) -> Result<Catalog> {
    let files = collect_feature_files(root)?;
    let mut catalog = Catalog::default();
    for path in &files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read feature file {}", path.display()))?;
        let document = gherkin::parse_feature(path, &text)
            .with_context(|| format!("parse feature file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            feature = %document.title,
            scenarios = document.scenarios.len(),
            "parsed feature file"
        );
        catalog.push_document(document);
    }
    if catalog.is_empty() {
        tracing::warn!(root = %root.display(), "no scenarios found");
    }
    tracing::info!(
        documents = files.len(),
        records = catalog.len(),
        "built scenario catalog"
    );
    Ok(catalog)
}
