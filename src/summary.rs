//! Human-readable account of a command run.
use crate::workflow::CommandReport;

/// Render `report` as the plain-text account printed on stdout.
pub fn render_report(report: &CommandReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("command: {}", report.command));
    lines.push(format!(
        "scenarios: {} in {} document(s)",
        report.scenarios, report.documents
    ));

    if let Some(duplicates) = &report.duplicates {
        for pair in &duplicates.collisions {
            lines.push("-> Found scenarios with the same title in the same file".to_string());
            lines.push(format!("   Title: {}", pair.title));
            lines.push(format!("   Scenario 1: {}", pair.first));
            lines.push(format!("   Scenario 2: {}", pair.second));
        }
        if duplicates.has_duplicates {
            lines.push("Duplicate scenarios found".to_string());
        } else {
            lines.push("No duplicate scenarios found".to_string());
        }
    }

    if let Some(snapshot) = &report.snapshot {
        lines.push(format!(
            "cached {} scenario(s) to {}",
            snapshot.records, snapshot.location
        ));
    }

    if let Some(shifts) = &report.shifts {
        for shift in &shifts.shifts {
            lines.push("Found shift".to_string());
            lines.push(format!("   Old: {}", shift.old));
            lines.push(format!("   New: {}", shift.new));
        }
        for location in &shifts.added {
            lines.push("New scenario found".to_string());
            lines.push(format!("   New: {location}"));
        }
        lines.push(format!(
            "shifts: {} moved, {} unchanged, {} new",
            shifts.shifts.len(),
            shifts.unchanged.len(),
            shifts.added.len()
        ));
    }

    if let Some(references) = &report.references {
        for update in references.iter().filter(|update| update.rewritten > 0) {
            lines.push(format!(
                "updated {}: {} citation(s) rewritten",
                update.path.display(),
                update.rewritten
            ));
        }
        lines.push(format!("reference documents: {}", references.len()));
    }

    if let Some(scan) = &report.scan {
        for location in &scan.added {
            lines.push("New scenario found".to_string());
            lines.push(format!("   New: {location}"));
        }
        for location in &scan.removed {
            lines.push("Scenario removed".to_string());
            lines.push(format!("   Deleted: {location}"));
        }
        lines.push(format!(
            "scan: {} new, {} removed",
            scan.added.len(),
            scan.removed.len()
        ));
    }

    if let Some(normalized) = &report.normalized {
        for edit in &normalized.edits {
            lines.push(format!(
                "Replacing {} at {} -> \"And\"",
                edit.keyword.as_str(),
                edit.location
            ));
        }
        lines.push(format!(
            "normalized: {} edit(s) in {} document(s)",
            normalized.edits.len(),
            normalized.documents.len()
        ));
    }

    for note in &report.notes {
        lines.push(format!("note: {note}"));
    }
    for failure in &report.failures {
        lines.push(format!("error: {}", failure.message));
    }
    match report.failure_count() {
        0 => lines.push("result: ok".to_string()),
        count => lines.push(format!("result: {count} failed step(s)")),
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn print_report(report: &CommandReport) {
    print!("{}", render_report(report));
}
