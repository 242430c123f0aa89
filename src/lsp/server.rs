//! Main Language Server Protocol server implementation for htmlcheck
//!
//! Maps editor document events onto a validation [`Session`]:
//! - the first HTML document opened is validated as the active document
//! - saves re-run the checker
//! - closes clear the document's diagnostics

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error as JsonRpcError, Result as JsonRpcResult};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::diagnostics::DiagnosticsStore;
use crate::host::Document;
use crate::lsp::host::LspHost;
use crate::lsp::types::{
    DIAGNOSTIC_SOURCE, HtmlCheckLspConfig, RESET_EXECUTABLE_COMMAND, TOGGLE_VALIDATION_COMMAND,
    VALIDATE_DOCUMENT_COMMAND, finding_to_diagnostic,
};
use crate::session::{Session, SessionEnvironment, ValidationStatus};
use crate::settings::{
    ConfigScope, ConfigurationSource, ENABLED_FLAG, EXECUTABLE_PATH_KEY, FileSettings, FlagStore, JAVA_PATH_KEY,
    MemorySettings, SettingsStore,
};

/// Main LSP server for htmlcheck
pub struct HtmlCheckLanguageServer {
    client: Client,
    /// Initialization options sent by the client
    config: Arc<RwLock<HtmlCheckLspConfig>>,
    /// Created once the client has finished initializing
    session: Arc<RwLock<Option<Arc<Session<LspHost>>>>>,
    /// Findings published per document, shared with the session's host
    diagnostics: Arc<RwLock<DiagnosticsStore>>,
    /// Language id of each open document
    documents: Arc<RwLock<HashMap<Url, String>>>,
    startup_validated: AtomicBool,
    /// First HTML document opened before the session existed
    pending_startup: RwLock<Option<Url>>,
    /// Settings file given on the command line, used unless the client names one
    default_settings_path: Option<String>,
}

impl HtmlCheckLanguageServer {
    pub fn new(client: Client) -> Self {
        Self::with_settings_path(client, None)
    }

    pub fn with_settings_path(client: Client, settings_path: Option<String>) -> Self {
        let config = HtmlCheckLspConfig {
            settings_path: settings_path.clone(),
            ..Default::default()
        };

        Self {
            client,
            config: Arc::new(RwLock::new(config)),
            session: Arc::new(RwLock::new(None)),
            diagnostics: Arc::new(RwLock::new(DiagnosticsStore::new())),
            documents: Arc::new(RwLock::new(HashMap::new())),
            startup_validated: AtomicBool::new(false),
            pending_startup: RwLock::new(None),
            default_settings_path: settings_path,
        }
    }

    async fn session(&self) -> Option<Arc<Session<LspHost>>> {
        self.session.read().await.clone()
    }

    /// Open the settings store, applying session-only overrides from the client
    fn open_settings(config: &HtmlCheckLspConfig) -> Arc<dyn SettingsStore> {
        let opened = match &config.settings_path {
            Some(path) => FileSettings::open(path),
            None => FileSettings::open_default(),
        };

        let settings: Arc<dyn SettingsStore> = match opened {
            Ok(settings) => {
                log::info!("Using settings file {}", settings.path().display());
                Arc::new(settings)
            }
            Err(e) => {
                log::warn!("Failed to open settings, falling back to in-memory settings: {e}");
                Arc::new(MemorySettings::new())
            }
        };

        let session_overrides = [
            (EXECUTABLE_PATH_KEY, &config.executable_path),
            (JAVA_PATH_KEY, &config.java_path),
        ];
        for (key, value) in session_overrides {
            if let Some(value) = value
                && let Err(e) = settings.set(key, Some(value.as_str()), ConfigScope::Session)
            {
                log::warn!("Failed to apply {key} from initialization options: {e}");
            }
        }

        if let Some(enabled) = config.enable_validation
            && let Err(e) = settings.set_flag(ENABLED_FLAG, enabled)
        {
            log::warn!("Failed to apply enableValidation: {e}");
        }

        settings
    }

    async fn start_session(&self) -> Arc<Session<LspHost>> {
        let config = self.config.read().await.clone();
        let settings = Self::open_settings(&config);
        let install_path = config
            .install_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(SessionEnvironment::default_install_path);

        let host = LspHost::new(self.client.clone(), self.diagnostics.clone(), config.show_notifications);
        let session = Arc::new(Session::start(host, settings, SessionEnvironment::detect(install_path)).await);

        *self.session.write().await = Some(session.clone());
        session
    }

    /// Validate the first HTML document once a session exists
    async fn validate_at_startup(&self, session: &Session<LspHost>, document: &Document) {
        if !self.startup_validated.swap(true, Ordering::SeqCst) {
            session.on_active_document_at_startup(document).await;
        }
    }

    async fn document(&self, uri: &Url) -> Option<Document> {
        let language_id = self.documents.read().await.get(uri).cloned().unwrap_or_default();
        Document::from_uri(uri.clone(), language_id)
    }

    async fn execute(&self, command: &str, arguments: Vec<Value>) -> JsonRpcResult<Option<Value>> {
        let Some(session) = self.session().await else {
            return Err(JsonRpcError::invalid_request());
        };

        match command {
            TOGGLE_VALIDATION_COMMAND => Ok(Some(json!(session.toggle().await))),
            RESET_EXECUTABLE_COMMAND => Ok(Some(match session.reset_executable() {
                Some(location) => json!(location.path.to_string_lossy()),
                None => Value::Null,
            })),
            VALIDATE_DOCUMENT_COMMAND => {
                let uri = arguments
                    .first()
                    .and_then(Value::as_str)
                    .and_then(|s| Url::parse(s).ok())
                    .ok_or_else(|| JsonRpcError::invalid_params("expected a document URI"))?;
                let Some(document) = self.document(&uri).await else {
                    return Err(JsonRpcError::invalid_params(format!("not a file URI: {uri}")));
                };

                match session.validate(&document).await {
                    ValidationStatus::Completed(outcome) => Ok(Some(json!({
                        "errors": outcome.error_count,
                        "warnings": outcome.warning_count,
                    }))),
                    ValidationStatus::Skipped(_) | ValidationStatus::Failed(_) => Ok(None),
                }
            }
            other => Err(JsonRpcError::invalid_params(format!("unknown command: {other}"))),
        }
    }

    fn full_report(items: Vec<Diagnostic>) -> DocumentDiagnosticReportResult {
        DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(RelatedFullDocumentDiagnosticReport {
            related_documents: None,
            full_document_diagnostic_report: FullDocumentDiagnosticReport { result_id: None, items },
        }))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for HtmlCheckLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> JsonRpcResult<InitializeResult> {
        log::info!("Initializing htmlcheck Language Server");

        if let Some(options) = params.initialization_options {
            match serde_json::from_value::<HtmlCheckLspConfig>(options) {
                Ok(mut config) => {
                    if config.settings_path.is_none() {
                        config.settings_path = self.default_settings_path.clone();
                    }
                    *self.config.write().await = config;
                }
                Err(e) => log::warn!("Ignoring invalid initialization options: {e}"),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::NONE),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some(DIAGNOSTIC_SOURCE.to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                })),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        TOGGLE_VALIDATION_COMMAND.to_string(),
                        VALIDATE_DOCUMENT_COMMAND.to_string(),
                        RESET_EXECUTABLE_COMMAND.to_string(),
                    ],
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "htmlcheck".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let session = self.start_session().await;
        log::info!("htmlcheck Language Server initialized ({})", session.indicator());
        self.client
            .log_message(MessageType::INFO, "htmlcheck Language Server started")
            .await;

        // Taken after the session is stored, so a concurrent open either sees
        // the session or has already parked its document here
        let pending = self.pending_startup.write().await.take();
        let Some(uri) = pending else {
            return;
        };
        let still_open = self.documents.read().await.contains_key(&uri);
        if still_open && let Some(document) = self.document(&uri).await {
            self.validate_at_startup(&session, &document).await;
        }
    }

    async fn shutdown(&self) -> JsonRpcResult<()> {
        log::info!("Shutting down htmlcheck Language Server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let language_id = params.text_document.language_id;

        self.documents.write().await.insert(uri.clone(), language_id.clone());

        let Some(document) = Document::from_uri(uri, language_id) else {
            return;
        };
        if !document.is_html() || self.startup_validated.load(Ordering::SeqCst) {
            return;
        }

        let session = {
            let mut pending = self.pending_startup.write().await;
            let session = self.session().await;
            if session.is_none() && pending.is_none() {
                *pending = Some(document.uri.clone());
            }
            session
        };

        if let Some(session) = session {
            self.validate_at_startup(&session, &document).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let Some(document) = self.document(&params.text_document.uri).await else {
            return;
        };

        if let Some(session) = self.session().await {
            session.on_document_saved(&document).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.remove(&uri);

        match self.session().await {
            Some(session) => session.on_document_closed(&uri).await,
            None => {
                self.diagnostics.write().await.clear(&uri);
                self.client.publish_diagnostics(uri, Vec::new(), None).await;
            }
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> JsonRpcResult<Option<Value>> {
        self.execute(&params.command, params.arguments).await
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> JsonRpcResult<DocumentDiagnosticReportResult> {
        let items = self
            .diagnostics
            .read()
            .await
            .get(&params.text_document.uri)
            .map(|findings| findings.iter().map(finding_to_diagnostic).collect())
            .unwrap_or_default();

        Ok(Self::full_report(items))
    }
}
