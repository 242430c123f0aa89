//! LSP type definitions and conversions for htmlcheck

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::*;

use crate::finding::{Finding, Severity};
use crate::state::{Indicator, NoticeLevel};

/// Diagnostic source shown next to each finding
pub const DIAGNOSTIC_SOURCE: &str = "htmlcheck";

pub const TOGGLE_VALIDATION_COMMAND: &str = "htmlcheck.toggleValidation";
pub const VALIDATE_DOCUMENT_COMMAND: &str = "htmlcheck.validateDocument";
pub const RESET_EXECUTABLE_COMMAND: &str = "htmlcheck.resetExecutable";

/// Initialization options accepted from the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlCheckLspConfig {
    /// Checker executable (or `vnu.jar`) for this session only
    pub executable_path: Option<String>,
    /// Directory the `validator/<platform>/...` layout lives under
    pub install_path: Option<String>,
    /// Settings file to use instead of the one in the user config directory
    pub settings_path: Option<String>,
    /// Java launcher for `.jar` executables, for this session only
    pub java_path: Option<String>,
    /// Persist this toggle value on startup
    pub enable_validation: Option<bool>,
    /// Send `window/showMessage` notices after each validation
    pub show_notifications: bool,
}

impl Default for HtmlCheckLspConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            install_path: None,
            settings_path: None,
            java_path: None,
            enable_validation: None,
            show_notifications: true,
        }
    }
}

/// Payload of the `htmlcheck/status` notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub indicator: Indicator,
    /// The client may jump to its findings list
    pub show_findings: bool,
}

/// Custom notification carrying the status indicator
pub enum StatusNotification {}

impl Notification for StatusNotification {
    type Params = StatusParams;
    const METHOD: &'static str = "htmlcheck/status";
}

/// Convert a finding into a zero-width LSP diagnostic at its position
pub fn finding_to_diagnostic(finding: &Finding) -> Diagnostic {
    let position = Position {
        line: finding.line,
        character: finding.column,
    };

    let severity = match finding.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: Range {
            start: position,
            end: position,
        },
        severity: Some(severity),
        code: None,
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: finding.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

pub fn notice_message_type(level: NoticeLevel) -> MessageType {
    match level {
        NoticeLevel::Info => MessageType::INFO,
        NoticeLevel::Warning => MessageType::WARNING,
        NoticeLevel::Error => MessageType::ERROR,
    }
}
