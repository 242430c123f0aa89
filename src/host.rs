//! The editor-facing seam: documents coming in, diagnostics and status going out.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::finding::Finding;
use crate::runner::ValidationError;
use crate::state::{Indicator, Notice};

/// Language identifier editors use for HTML
pub const HTML_LANGUAGE_ID: &str = "html";

/// A document known to the editor, backed by a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub uri: Url,
    pub path: PathBuf,
    pub language_id: String,
}

impl Document {
    /// Build a document from a `file://` URI. Other schemes have no file to
    /// validate and yield `None`.
    pub fn from_uri(uri: Url, language_id: impl Into<String>) -> Option<Self> {
        let path = uri.to_file_path().ok()?;
        Some(Self {
            uri,
            path,
            language_id: language_id.into(),
        })
    }

    pub fn from_path(path: impl Into<PathBuf>, language_id: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let uri = Url::from_file_path(&path).ok()?;
        Some(Self {
            uri,
            path,
            language_id: language_id.into(),
        })
    }

    /// HTML by language id, or by extension when the language is unknown
    pub fn is_html(&self) -> bool {
        if self.language_id.is_empty() {
            has_html_extension(&self.path)
        } else {
            self.language_id == HTML_LANGUAGE_ID
        }
    }
}

pub fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Everything the session writes back to the editor
#[async_trait]
pub trait Host: Send + Sync {
    /// Replace the findings shown for `uri`
    async fn set_diagnostics(&self, uri: &Url, findings: &[Finding]);

    /// Remove all findings shown for `uri`
    async fn clear_diagnostics(&self, uri: &Url);

    /// Render the status indicator, plus a transient notice when one is given
    async fn present(&self, indicator: Indicator, notice: Option<Notice>);

    /// Tell the user a validation could not produce findings
    async fn report_failure(&self, message: &str, error: Option<&ValidationError>);
}
