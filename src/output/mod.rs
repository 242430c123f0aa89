//! Output formatting for `htmlcheck check`

use crate::finding::ValidationOutcome;
use std::io::{self, Write};
use std::str::FromStr;

pub mod formatters;

pub use formatters::*;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the findings of one validated file
    fn format_outcome(&self, outcome: &ValidationOutcome, file_path: &str) -> String;

    /// Format a summary of results across multiple files
    fn format_summary(&self, _files_checked: usize, _total_errors: usize, _total_warnings: usize) -> Option<String> {
        None
    }

    /// Whether this formatter should use colors
    fn use_colors(&self) -> bool {
        false
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable `file:line:col: severity: message` lines
    #[default]
    Text,
    /// One JSON document covering every file, see [`format_all_outcomes_as_json`]
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Output writer that handles stdout/stderr routing
pub struct OutputWriter {
    quiet: bool,
}

impl OutputWriter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Write a line to stdout unless quiet
    pub fn writeln(&self, content: &str) -> io::Result<()> {
        if self.quiet || content.is_empty() {
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{content}")?;
        stdout.flush()
    }

    /// Write error output (always to stderr)
    pub fn write_error(&self, content: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{content}")
    }
}
