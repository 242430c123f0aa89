//! [`Host`] implementation that talks to an LSP client.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageType, Url};

use crate::diagnostics::DiagnosticsStore;
use crate::finding::Finding;
use crate::host::Host;
use crate::lsp::types::{StatusNotification, StatusParams, finding_to_diagnostic, notice_message_type};
use crate::runner::ValidationError;
use crate::state::{Indicator, Notice};

pub struct LspHost {
    client: Client,
    diagnostics: Arc<RwLock<DiagnosticsStore>>,
    show_notifications: bool,
}

impl LspHost {
    pub fn new(client: Client, diagnostics: Arc<RwLock<DiagnosticsStore>>, show_notifications: bool) -> Self {
        Self {
            client,
            diagnostics,
            show_notifications,
        }
    }
}

#[async_trait]
impl Host for LspHost {
    async fn set_diagnostics(&self, uri: &Url, findings: &[Finding]) {
        self.diagnostics.write().await.set(uri.clone(), findings.to_vec());

        let diagnostics = findings.iter().map(finding_to_diagnostic).collect();
        self.client.publish_diagnostics(uri.clone(), diagnostics, None).await;
    }

    async fn clear_diagnostics(&self, uri: &Url) {
        self.diagnostics.write().await.clear(uri);
        self.client.publish_diagnostics(uri.clone(), Vec::new(), None).await;
    }

    async fn present(&self, indicator: Indicator, notice: Option<Notice>) {
        let show_findings = notice.as_ref().is_some_and(|n| n.offer_findings_view);
        self.client
            .send_notification::<StatusNotification>(StatusParams {
                indicator,
                show_findings,
            })
            .await;

        if self.show_notifications
            && let Some(notice) = notice
        {
            self.client
                .show_message(notice_message_type(notice.level), notice.message)
                .await;
        }
    }

    async fn report_failure(&self, message: &str, error: Option<&ValidationError>) {
        self.client.show_message(MessageType::ERROR, message).await;

        match error {
            Some(ValidationError::ProcessExecution { stderr, .. }) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Error running HTML checker: {stderr}"))
                    .await;
            }
            Some(ValidationError::OutputParse { detail, stdout }) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Failed to parse validator output: {detail}"))
                    .await;
                self.client
                    .log_message(MessageType::LOG, format!("Validator Output: {stdout}"))
                    .await;
            }
            _ => {}
        }
    }
}
