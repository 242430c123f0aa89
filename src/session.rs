//! The session controller.
//!
//! Owns the process-wide validation state, the resolved executable and the
//! settings store, and turns editor events into checker runs. Locks guard
//! short critical sections only and are never held across an `.await`, so
//! overlapping runs apply their results in completion order.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::finding::ValidationOutcome;
use crate::host::{Document, Host};
use crate::platform::PlatformFamily;
use crate::resolver::{ExecutableLocation, ResolveError, Resolver};
use crate::runner::{DEFAULT_JAVA, ValidationError, ValidationRequest, ValidationRunner};
use crate::settings::{ConfigurationSource, ENABLED_FLAG, FlagStore, JAVA_PATH_KEY, SettingsStore};
use crate::state::{Indicator, Notice, ValidationState};

/// Facts about the running process the session is built from
#[derive(Debug, Clone)]
pub struct SessionEnvironment {
    pub platform: Result<PlatformFamily, ResolveError>,
    pub install_path: PathBuf,
}

impl SessionEnvironment {
    /// Environment for the current OS
    pub fn detect(install_path: impl Into<PathBuf>) -> Self {
        Self {
            platform: PlatformFamily::current(),
            install_path: install_path.into(),
        }
    }

    /// Directory holding the running binary, where the bundled checker is
    /// expected when no install path is given
    pub fn default_install_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Validation is toggled off
    Disabled,
    /// The document is not HTML
    NotHtml,
    /// No checker is available on this platform
    Unavailable,
}

/// What happened to one trigger
#[derive(Debug)]
pub enum ValidationStatus {
    Skipped(SkipReason),
    Completed(ValidationOutcome),
    Failed(ValidationError),
}

impl ValidationStatus {
    pub fn outcome(&self) -> Option<&ValidationOutcome> {
        match self {
            ValidationStatus::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Session<H: Host> {
    host: H,
    settings: Arc<dyn SettingsStore>,
    resolver: Option<Resolver>,
    runner: ValidationRunner,
    state: Mutex<ValidationState>,
    executable: Mutex<Option<ExecutableLocation>>,
}

impl<H: Host> Session<H> {
    /// Build the session from persisted settings and resolve the checker.
    ///
    /// On an unsupported platform validation stays off for the whole session
    /// and the host is told once.
    pub async fn start(host: H, settings: Arc<dyn SettingsStore>, environment: SessionEnvironment) -> Self {
        let enabled = settings.get_flag(ENABLED_FLAG).unwrap_or(true);
        let java = settings.get(JAVA_PATH_KEY).unwrap_or_else(|| DEFAULT_JAVA.to_string());

        let (resolver, executable) = match environment.platform {
            Ok(platform) => {
                let resolver = Resolver::new(platform, environment.install_path);
                let executable = resolver.resolve(settings.as_ref());
                (Some(resolver), Some(executable))
            }
            Err(e) => {
                log::error!("HTML validation unavailable: {e}");
                host.report_failure(&e.to_string(), None).await;
                (None, None)
            }
        };

        let session = Self {
            host,
            settings,
            resolver,
            runner: ValidationRunner::new(java),
            state: Mutex::new(ValidationState::new(enabled)),
            executable: Mutex::new(executable),
        };

        session.host.present(session.indicator(), None).await;
        session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> ValidationState {
        *lock(&self.state)
    }

    pub fn executable(&self) -> Option<ExecutableLocation> {
        lock(&self.executable).clone()
    }

    /// Whether a checker could be located for this platform
    pub fn is_available(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn indicator(&self) -> Indicator {
        if self.is_available() {
            self.state().indicator()
        } else {
            Indicator::Disabled
        }
    }

    /// The active document when the editor connects
    pub async fn on_active_document_at_startup(&self, document: &Document) -> ValidationStatus {
        self.validate(document).await
    }

    pub async fn on_document_saved(&self, document: &Document) -> ValidationStatus {
        self.validate(document).await
    }

    pub async fn on_document_closed(&self, uri: &Url) {
        self.host.clear_diagnostics(uri).await;
    }

    /// Flip the enabled flag, persist it and refresh the indicator.
    /// Returns the new value.
    pub async fn toggle(&self) -> bool {
        let (enabled, indicator) = {
            let mut state = lock(&self.state);
            state.enabled = !state.enabled;
            (state.enabled, state.indicator())
        };

        if let Err(e) = self.settings.set_flag(ENABLED_FLAG, enabled) {
            log::warn!("Failed to persist validation toggle: {e}");
        }
        log::info!("HTML validation {}", if enabled { "enabled" } else { "disabled" });

        let indicator = if self.is_available() { indicator } else { Indicator::Disabled };
        self.host.present(indicator, None).await;
        enabled
    }

    /// Forget the executable override and derive the default again
    pub fn reset_executable(&self) -> Option<ExecutableLocation> {
        let resolver = self.resolver.as_ref()?;
        let location = resolver.invalidate(self.settings.as_ref());
        *lock(&self.executable) = Some(location.clone());
        Some(location)
    }

    /// Run the checker on `document` and publish the result.
    ///
    /// Failures leave stored diagnostics and state untouched.
    pub async fn validate(&self, document: &Document) -> ValidationStatus {
        if !document.is_html() {
            return ValidationStatus::Skipped(SkipReason::NotHtml);
        }
        if !self.state().enabled {
            log::debug!("Validation disabled, skipping {}", document.uri);
            return ValidationStatus::Skipped(SkipReason::Disabled);
        }
        let Some(executable) = self.executable() else {
            return ValidationStatus::Skipped(SkipReason::Unavailable);
        };

        let request = ValidationRequest {
            file_path: document.path.clone(),
            executable,
        };

        match self.runner.run(&request).await {
            Ok(outcome) => {
                log::debug!(
                    "Validated {}: {} error(s), {} warning(s)",
                    document.uri,
                    outcome.error_count,
                    outcome.warning_count
                );
                self.host.set_diagnostics(&document.uri, &outcome.findings).await;

                let indicator = {
                    let mut state = lock(&self.state);
                    state.record(&outcome);
                    state.indicator()
                };
                self.host.present(indicator, Some(Notice::for_outcome(&outcome))).await;

                ValidationStatus::Completed(outcome)
            }
            Err(e) => {
                log::error!("Failed to validate {}: {e}", document.uri);
                self.host.report_failure(&e.to_string(), Some(&e)).await;
                ValidationStatus::Failed(e)
            }
        }
    }
}
