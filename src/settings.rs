//! Persistent settings: the executable override and the validation toggle.
//!
//! Two narrow interfaces are consumed by the session:
//! - [`ConfigurationSource`]: string settings with a persistence scope
//! - [`FlagStore`]: boolean flags that survive restarts
//!
//! [`FileSettings`] backs both with a TOML file in the user config directory:
//!
//! ```toml
//! [settings]
//! executablePath = "/opt/vnu/vnu-runtime-image/bin/vnu"
//! javaPath = "java"
//!
//! [flags]
//! enabled = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Override for the checker executable path
pub const EXECUTABLE_PATH_KEY: &str = "executablePath";
/// Java launcher used when the executable is a `.jar`
pub const JAVA_PATH_KEY: &str = "javaPath";
/// Whether validation runs at all
pub const ENABLED_FLAG: &str = "enabled";

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Errors that can occur when loading or storing settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access settings file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    #[error("Failed to parse settings: {0}")]
    ParseError(String),

    #[error("Failed to serialize settings: {0}")]
    SerializeError(String),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),
}

/// Where a configuration write lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Persisted and shared by every session
    Global,
    /// Kept in memory until the process exits
    Session,
}

/// Key-value configuration for string settings
pub trait ConfigurationSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`; `None` clears the setting.
    fn set(&self, key: &str, value: Option<&str>, scope: ConfigScope) -> Result<(), ConfigError>;
}

/// Persisted boolean flags
pub trait FlagStore: Send + Sync {
    fn get_flag(&self, key: &str) -> Option<bool>;
    fn set_flag(&self, key: &str, value: bool) -> Result<(), ConfigError>;
}

/// Everything the session needs from settings storage
pub trait SettingsStore: ConfigurationSource + FlagStore {}

impl<T: ConfigurationSource + FlagStore> SettingsStore for T {}

/// On-disk settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "htmlcheck settings")]
pub struct SettingsFile {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub flags: FlagsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSection {
    /// Path to the checker launcher (or `vnu.jar`). `${extensionPath}` expands to the install path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,

    /// Java launcher used for `.jar` executables (default: `java`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlagsSection {
    /// Run the checker on save and open (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl SettingsFile {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    fn setting(&self, key: &str) -> Result<Option<&String>, ConfigError> {
        match key {
            EXECUTABLE_PATH_KEY => Ok(self.settings.executable_path.as_ref()),
            JAVA_PATH_KEY => Ok(self.settings.java_path.as_ref()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    fn setting_mut(&mut self, key: &str) -> Result<&mut Option<String>, ConfigError> {
        match key {
            EXECUTABLE_PATH_KEY => Ok(&mut self.settings.executable_path),
            JAVA_PATH_KEY => Ok(&mut self.settings.java_path),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match key {
            ENABLED_FLAG => Ok(self.flags.enabled),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    fn flag_mut(&mut self, key: &str) -> Result<&mut Option<bool>, ConfigError> {
        match key {
            ENABLED_FLAG => Ok(&mut self.flags.enabled),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session-scoped overrides shared by both store implementations
#[derive(Debug, Default)]
struct SessionOverlay {
    values: Mutex<BTreeMap<String, Option<String>>>,
}

impl SessionOverlay {
    fn get(&self, key: &str) -> Option<Option<String>> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Option<&str>) {
        lock(&self.values).insert(key.to_string(), value.map(str::to_string));
    }

    fn forget(&self, key: &str) {
        lock(&self.values).remove(key);
    }
}

/// Settings held only in memory, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemorySettings {
    file: Mutex<SettingsFile>,
    overlay: SessionOverlay,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file: SettingsFile) -> Self {
        Self {
            file: Mutex::new(file),
            overlay: SessionOverlay::default(),
        }
    }

    /// Snapshot of the globally scoped values
    pub fn snapshot(&self) -> SettingsFile {
        lock(&self.file).clone()
    }
}

impl ConfigurationSource for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overlay.get(key) {
            return value;
        }
        lock(&self.file).setting(key).ok().flatten().cloned()
    }

    fn set(&self, key: &str, value: Option<&str>, scope: ConfigScope) -> Result<(), ConfigError> {
        match scope {
            ConfigScope::Session => {
                lock(&self.file).setting(key)?;
                self.overlay.set(key, value);
            }
            ConfigScope::Global => {
                *lock(&self.file).setting_mut(key)? = value.map(str::to_string);
                self.overlay.forget(key);
            }
        }
        Ok(())
    }
}

impl FlagStore for MemorySettings {
    fn get_flag(&self, key: &str) -> Option<bool> {
        lock(&self.file).flag(key).ok().flatten()
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), ConfigError> {
        *lock(&self.file).flag_mut(key)? = Some(value);
        Ok(())
    }
}

/// Settings persisted to a TOML file
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    file: Mutex<SettingsFile>,
    overlay: SessionOverlay,
}

impl FileSettings {
    /// Open the settings file at `path`. A missing file yields empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let file = match fs::read_to_string(&path) {
            Ok(content) => SettingsFile::parse(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                SettingsFile::default()
            }
            Err(source) => {
                return Err(ConfigError::IoError {
                    source,
                    path: path.display().to_string(),
                });
            }
        };

        Ok(Self {
            path,
            file: Mutex::new(file),
            overlay: SessionOverlay::default(),
        })
    }

    /// Open the settings file in the platform config directory
    pub fn open_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => Err(ConfigError::IoError {
                source: io::Error::new(io::ErrorKind::NotFound, "no user configuration directory"),
                path: SETTINGS_FILE_NAME.to_string(),
            }),
        }
    }

    /// `<config dir>/htmlcheck/settings.toml`, when a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        use etcetera::{BaseStrategy, choose_base_strategy};

        match choose_base_strategy() {
            Ok(strategy) => Some(strategy.config_dir().join("htmlcheck").join(SETTINGS_FILE_NAME)),
            Err(e) => {
                log::debug!("Failed to determine user config directory: {e}");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, file: &SettingsFile) -> Result<(), ConfigError> {
        let content = file.to_toml()?;
        let io_error = |source| ConfigError::IoError {
            source,
            path: self.path.display().to_string(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&self.path, content).map_err(io_error)?;
        log::debug!("Wrote settings to {}", self.path.display());
        Ok(())
    }
}

impl ConfigurationSource for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overlay.get(key) {
            return value;
        }
        lock(&self.file).setting(key).ok().flatten().cloned()
    }

    fn set(&self, key: &str, value: Option<&str>, scope: ConfigScope) -> Result<(), ConfigError> {
        match scope {
            ConfigScope::Session => {
                lock(&self.file).setting(key)?;
                self.overlay.set(key, value);
                Ok(())
            }
            ConfigScope::Global => {
                let mut file = lock(&self.file);
                let mut updated = file.clone();
                *updated.setting_mut(key)? = value.map(str::to_string);
                self.persist(&updated)?;
                *file = updated;
                self.overlay.forget(key);
                Ok(())
            }
        }
    }
}

impl FlagStore for FileSettings {
    fn get_flag(&self, key: &str) -> Option<bool> {
        lock(&self.file).flag(key).ok().flatten()
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), ConfigError> {
        let mut file = lock(&self.file);
        let mut updated = file.clone();
        *updated.flag_mut(key)? = Some(value);
        self.persist(&updated)?;
        *file = updated;
        Ok(())
    }
}
