//! JSON output formatter

use crate::finding::ValidationOutcome;
use serde_json::{Value, json};

fn outcome_to_json(outcome: &ValidationOutcome, file_path: &str) -> Vec<Value> {
    outcome
        .findings
        .iter()
        .map(|finding| {
            json!({
                "file": file_path,
                "line": finding.line.saturating_add(1),
                "column": finding.column.saturating_add(1),
                "severity": finding.severity,
                "message": finding.message,
            })
        })
        .collect()
}

/// Format every file's findings as a single JSON document
pub fn format_all_outcomes_as_json(all_outcomes: &[(String, ValidationOutcome)]) -> String {
    let findings: Vec<Value> = all_outcomes
        .iter()
        .flat_map(|(file_path, outcome)| outcome_to_json(outcome, file_path))
        .collect();
    let errors: usize = all_outcomes.iter().map(|(_, outcome)| outcome.error_count).sum();
    let warnings: usize = all_outcomes.iter().map(|(_, outcome)| outcome.warning_count).sum();

    let document = json!({
        "files": all_outcomes.len(),
        "errors": errors,
        "warnings": warnings,
        "findings": findings,
    });

    serde_json::to_string_pretty(&document).unwrap_or_default()
}
