//! Reference rewriting for shifted scenarios.
//!
//! Reference documents cite scenarios as `[dir/file.feature:12]` or as a link
//! anchor `dir/file.feature#L12)` starting at a path boundary. Each freshly written citation carries a
//! sentinel until every shift has been applied, so a rewritten citation can
//! never be matched again by another shift in the same run. The sentinel is
//! stripped before the text is returned.
use crate::diff::Shift;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Two Unicode noncharacters; never present in reference text.
const SENTINEL: &str = "\u{FDD0}\u{FDD1}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Number of citations rewritten.
    pub rewritten: usize,
}

/// Result of rewriting one reference document.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceUpdate {
    pub path: PathBuf,
    pub rewritten: usize,
}

#[derive(Debug, Clone)]
struct Replacement {
    pattern: String,
    replacement: String,
}

/// Search/replace pairs for both citation forms.
#[derive(Debug, Clone, Default)]
struct RewritePlan {
    bracketed: Vec<Replacement>,
    anchored: Vec<Replacement>,
}

/// Convert `path:line` into the link anchor form `path#Lline`.
pub fn anchor_form(location: &str) -> Result<String> {
    let mut parts = location.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(path), Some(line), None) if !path.is_empty() && !line.is_empty() => {
            Ok(format!("{path}#L{line}"))
        }
        _ => Err(anyhow!("could not parse location {location:?}")),
    }
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Replace anchor citations that start at a path boundary, so `auth/x#L5)`
/// is not found inside `oauth/x#L5)`.
fn replace_anchored(text: &str, step: &Replacement) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, matched) in text.match_indices(&step.pattern) {
        if matches!(text[..start].chars().next_back(), Some(c) if is_path_char(c)) {
            continue;
        }
        out.push_str(&text[copied..start]);
        out.push_str(&step.replacement);
        copied = start + matched.len();
    }
    out.push_str(&text[copied..]);
    out
}

impl RewritePlan {
    /// Prepare patterns for `shifts`; a malformed location fails the whole plan.
    ///
    /// When two shifts share an old location the later one wins.
    fn new(shifts: &[Shift]) -> Result<Self> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut plan = Self::default();
        for shift in shifts {
            let bracketed = Replacement {
                pattern: format!("[{}]", shift.old),
                replacement: format!("[{}{SENTINEL}]", shift.new),
            };
            let anchored = Replacement {
                pattern: format!("{})", anchor_form(&shift.old)?),
                replacement: format!("{}{SENTINEL})", anchor_form(&shift.new)?),
            };
            match slots.get(shift.old.as_str()) {
                Some(&slot) => {
                    plan.bracketed[slot] = bracketed;
                    plan.anchored[slot] = anchored;
                }
                None => {
                    slots.insert(&shift.old, plan.bracketed.len());
                    plan.bracketed.push(bracketed);
                    plan.anchored.push(anchored);
                }
            }
        }
        Ok(plan)
    }

    /// Rewrite every citation in `text`, each at most once.
    fn apply(&self, text: &str) -> RewriteOutcome {
        let mut contents = text.to_string();
        for step in &self.bracketed {
            if contents.contains(&step.pattern) {
                contents = contents.replace(&step.pattern, &step.replacement);
            }
        }
        for step in &self.anchored {
            if contents.contains(&step.pattern) {
                contents = replace_anchored(&contents, step);
            }
        }
        let rewritten = contents.matches(SENTINEL).count();
        RewriteOutcome {
            text: contents.replace(SENTINEL, ""),
            rewritten,
        }
    }
}

/// Rewrite every citation of a shifted scenario in `text`, each at most once.
///
/// A malformed location in `shifts` fails the whole pass.
pub fn rewrite_references(shifts: &[Shift], text: &str) -> Result<RewriteOutcome> {
    Ok(RewritePlan::new(shifts)?.apply(text))
}

/// Rewrite, in place, every file in `dir` whose name starts with `prefix`.
///
/// Files are visited in sorted order; unchanged files are left untouched.
pub fn rewrite_reference_dir(
    dir: &Path,
    prefix: &str,
    shifts: &[Shift],
) -> Result<Vec<ReferenceUpdate>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let has_prefix = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(prefix));
        let path = entry.path();
        if has_prefix && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut updates = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read reference document {}", path.display()))?;
        let outcome = rewrite_references(shifts, &text)
            .with_context(|| format!("rewrite reference document {}", path.display()))?;
        if outcome.text != text {
            fs::write(&path, outcome.text.as_bytes())
                .with_context(|| format!("write reference document {}", path.display()))?;
        }
        tracing::debug!(
            path = %path.display(),
            rewritten = outcome.rewritten,
            "rewrote reference document"
        );
        updates.push(ReferenceUpdate {
            path,
            rewritten: outcome.rewritten,
        });
    }
    Ok(updates)
}
