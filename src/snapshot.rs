//! Snapshot persistence for the previous catalog.
//!
//! The snapshot is the only state carried between invocations. Each save
//! overwrites it wholesale; loads are lenient so a partially damaged file
//! still yields every record that parses.
use crate::catalog::{Catalog, ScenarioRecord};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "output.json";

/// The snapshot could not be read; run `cache` first.
#[derive(Debug)]
pub struct SnapshotUnavailable {
    pub location: String,
    pub reason: String,
}

impl fmt::Display for SnapshotUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "snapshot {} is unavailable ({}); run `cache` first",
            self.location, self.reason
        )
    }
}

impl std::error::Error for SnapshotUnavailable {}

/// Storage for the previous catalog, passed explicitly into each operation.
pub trait SnapshotStore {
    /// Replace the stored snapshot with `records`.
    fn save(&mut self, records: &[ScenarioRecord]) -> Result<()>;

    /// Read the stored snapshot; fails with [`SnapshotUnavailable`].
    fn load(&self) -> Result<Catalog>;

    /// Human-readable location for reports.
    fn location(&self) -> String;
}

/// Snapshot kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&mut self, records: &[ScenarioRecord]) -> Result<()> {
        let text = encode_snapshot(records)?;
        write_replacing(&self.path, text.as_bytes())?;
        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "wrote snapshot"
        );
        Ok(())
    }

    fn load(&self) -> Result<Catalog> {
        let text = fs::read_to_string(&self.path).map_err(|err| SnapshotUnavailable {
            location: self.location(),
            reason: err.to_string(),
        })?;
        let records = decode_snapshot(&text);
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "loaded snapshot"
        );
        Ok(Catalog::from_records(records))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write through a sibling temp file so readers never see a torn snapshot.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("snapshot");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}

fn encode_snapshot(records: &[ScenarioRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("serialize snapshot")
}

/// Decode every record that parses; anything else is skipped with a warning.
fn decode_snapshot(text: &str) -> Vec<ScenarioRecord> {
    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("snapshot is not a JSON array; treating it as empty");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(error = %err, "snapshot is not valid JSON; treating it as empty");
            return Vec::new();
        }
    };
    let mut records = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ScenarioRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(index = idx, error = %err, "skipping snapshot entry"),
        }
    }
    records
}

/// In-memory snapshot holding the encoded JSON text.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    pub text: Option<String>,
}

#[cfg(test)]
impl SnapshotStore for MemorySnapshotStore {
    fn save(&mut self, records: &[ScenarioRecord]) -> Result<()> {
        self.text = Some(encode_snapshot(records)?);
        Ok(())
    }

    fn load(&self) -> Result<Catalog> {
        let text = self.text.as_deref().ok_or_else(|| SnapshotUnavailable {
            location: self.location(),
            reason: "nothing cached".to_string(),
        })?;
        Ok(Catalog::from_records(decode_snapshot(text)))
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
