//! Default text output formatter with colors

use crate::finding::{Severity, ValidationOutcome};
use crate::output::OutputFormatter;
use colored::*;

/// Default human-readable formatter with colors
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn paint(&self, text: String, style: fn(ColoredString) -> ColoredString) -> String {
        if self.use_colors {
            style(text.normal()).to_string()
        } else {
            text
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_outcome(&self, outcome: &ValidationOutcome, file_path: &str) -> String {
        let lines: Vec<String> = outcome
            .findings
            .iter()
            .map(|finding| {
                // Findings are zero-based; terminals expect one-based positions
                let severity = match finding.severity {
                    Severity::Error => self.paint(finding.severity.to_string(), |s| s.red().bold()),
                    Severity::Warning => self.paint(finding.severity.to_string(), |s| s.yellow().bold()),
                };
                format!(
                    "{}:{}:{}: {}: {}",
                    self.paint(file_path.to_string(), |s| s.blue().underline()),
                    self.paint(finding.line.saturating_add(1).to_string(), |s| s.cyan()),
                    self.paint(finding.column.saturating_add(1).to_string(), |s| s.cyan()),
                    severity,
                    finding.message
                )
            })
            .collect();

        lines.join("\n")
    }

    fn format_summary(&self, files_checked: usize, total_errors: usize, total_warnings: usize) -> Option<String> {
        let files = if files_checked == 1 { "file" } else { "files" };
        let summary = format!(
            "Checked {files_checked} {files}: {total_errors} error(s), {total_warnings} warning(s)"
        );

        Some(if !self.use_colors {
            summary
        } else if total_errors > 0 {
            summary.red().bold().to_string()
        } else if total_warnings > 0 {
            summary.yellow().to_string()
        } else {
            summary.green().to_string()
        })
    }

    fn use_colors(&self) -> bool {
        self.use_colors
    }
}
