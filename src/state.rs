//! Session-wide validation state and what the presentation layer derives from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::finding::ValidationOutcome;

/// Mutated only by the user toggle and by completed validations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationState {
    pub enabled: bool,
    pub last_had_errors: bool,
    pub last_had_warnings: bool,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ValidationState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_had_errors: false,
            last_had_warnings: false,
        }
    }

    pub fn record(&mut self, outcome: &ValidationOutcome) {
        self.last_had_errors = outcome.has_errors();
        self.last_had_warnings = outcome.has_warnings();
    }

    pub fn indicator(&self) -> Indicator {
        if !self.enabled {
            Indicator::Disabled
        } else if self.last_had_errors {
            Indicator::Errors
        } else if self.last_had_warnings {
            Indicator::Warnings
        } else {
            Indicator::Clean
        }
    }
}

/// Status summary rendered by the editor (status bar icon and colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Disabled,
    Clean,
    Warnings,
    Errors,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Indicator::Disabled => "disabled",
            Indicator::Clean => "clean",
            Indicator::Warnings => "warnings",
            Indicator::Errors => "errors",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient notification shown after a validation completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Offer to jump to the findings list
    pub offer_findings_view: bool,
}

impl Notice {
    pub fn for_outcome(outcome: &ValidationOutcome) -> Self {
        if outcome.has_errors() {
            Self {
                level: NoticeLevel::Error,
                message: "1 or more ERRORS found, please fix".to_string(),
                offer_findings_view: true,
            }
        } else if outcome.has_warnings() {
            Self {
                level: NoticeLevel::Warning,
                message: "1 or more WARNINGS found".to_string(),
                offer_findings_view: false,
            }
        } else {
            Self {
                level: NoticeLevel::Info,
                message: "Everything is fine".to_string(),
                offer_findings_view: false,
            }
        }
    }
}
