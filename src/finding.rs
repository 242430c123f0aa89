//! Normalized checker findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding. The checker's vocabulary is folded into two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One issue reported by the checker, positioned with 0-based line and column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Result of one validation request.
///
/// When `parse_failure` is `None`, `error_count + warning_count == findings.len()`.
/// When it is `Some`, `findings` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub findings: Vec<Finding>,
    pub error_count: usize,
    pub warning_count: usize,
    pub parse_failure: Option<String>,
}

impl ValidationOutcome {
    /// Build an outcome from findings, counting them by severity
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let error_count = findings.iter().filter(|f| f.severity == Severity::Error).count();
        let warning_count = findings.len() - error_count;
        Self {
            findings,
            error_count,
            warning_count,
            parse_failure: None,
        }
    }

    pub fn parse_failed(detail: impl Into<String>) -> Self {
        Self {
            parse_failure: Some(detail.into()),
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            severity,
            line: 0,
            column: 0,
            message: "x".to_string(),
        }
    }

    #[test]
    fn test_counts_by_severity() {
        let outcome = ValidationOutcome::from_findings(vec![
            finding(Severity::Error),
            finding(Severity::Warning),
            finding(Severity::Error),
        ]);
        assert_eq!(outcome.error_count, 2);
        assert_eq!(outcome.warning_count, 1);
        assert!(outcome.has_errors());
        assert!(outcome.parse_failure.is_none());
    }

    #[test]
    fn test_parse_failed_has_no_findings() {
        let outcome = ValidationOutcome::parse_failed("EOF while parsing");
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.error_count + outcome.warning_count, 0);
        assert_eq!(outcome.parse_failure.as_deref(), Some("EOF while parsing"));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&finding(Severity::Warning)).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
    }
}
