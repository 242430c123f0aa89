//! Translation of the checker's JSON report into findings.
//!
//! In `--format json` mode the checker writes a single document to its
//! diagnostic stream:
//!
//! ```json
//! {"messages":[{"type":"error","lastLine":5,"lastColumn":10,"message":"bad tag"}]}
//! ```
//!
//! Positions are 1-based and are converted to 0-based, clamped at zero.

use serde::Deserialize;

use crate::finding::{Finding, Severity, ValidationOutcome};

#[derive(Debug, Deserialize)]
struct CheckerReport {
    messages: Vec<CheckerMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckerMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    last_line: i64,
    #[serde(default)]
    last_column: i64,
    #[serde(default)]
    message: String,
}

impl CheckerMessage {
    fn into_finding(self) -> Finding {
        let severity = if self.kind == "error" {
            Severity::Error
        } else {
            Severity::Warning
        };
        Finding {
            severity,
            line: to_zero_based(self.last_line),
            column: to_zero_based(self.last_column),
            message: self.message,
        }
    }
}

fn to_zero_based(position: i64) -> u32 {
    u32::try_from(position.saturating_sub(1).max(0)).unwrap_or(u32::MAX)
}

/// Parse the checker's diagnostic-stream text into a [`ValidationOutcome`].
///
/// Never fails: malformed input yields an outcome with no findings and
/// `parse_failure` set.
pub fn translate(diagnostic_text: &str) -> ValidationOutcome {
    match serde_json::from_str::<CheckerReport>(diagnostic_text) {
        Ok(report) => {
            ValidationOutcome::from_findings(report.messages.into_iter().map(CheckerMessage::into_finding).collect())
        }
        Err(e) => ValidationOutcome::parse_failed(e.to_string()),
    }
}
