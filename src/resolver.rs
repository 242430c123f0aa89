//! Locating the checker executable.
//!
//! A user override always wins. Without one, the path is derived from the
//! install directory using the per-platform layout
//! `validator/<tag>/vnu-runtime-image/bin/<launcher>` and written back as the
//! override, so later sessions skip the derivation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::platform::{OsFamily, PlatformFamily};
use crate::settings::{ConfigScope, ConfigurationSource, EXECUTABLE_PATH_KEY};

/// Placeholders accepted inside an override, expanded to the install path
const INSTALL_PATH_PLACEHOLDERS: &[&str] = &["${extensionPath}", "${workspaceFolder}"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unsupported platform '{os}': the HTML checker is only available for linux, macOS and windows")]
    UnsupportedPlatform { os: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableOrigin {
    UserConfigured,
    DerivedDefault,
}

impl fmt::Display for ExecutableOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutableOrigin::UserConfigured => f.write_str("user-configured"),
            ExecutableOrigin::DerivedDefault => f.write_str("derived default"),
        }
    }
}

/// Resolved path to the checker launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableLocation {
    pub path: PathBuf,
    pub origin: ExecutableOrigin,
}

/// Install path as it should be joined on `platform`.
///
/// Windows hosts report install paths as `/c:/Users/...`; the single leading
/// separator is dropped there.
pub fn normalize_install_path(platform: PlatformFamily, install_path: &Path) -> PathBuf {
    if platform.os_family() == OsFamily::Windows {
        let raw = install_path.to_string_lossy();
        if let Some(stripped) = raw.strip_prefix(['/', '\\']) {
            return PathBuf::from(stripped);
        }
    }
    install_path.to_path_buf()
}

/// Conventional location of the launcher below `install_path`
pub fn default_executable_path(platform: PlatformFamily, install_path: &Path) -> PathBuf {
    normalize_install_path(platform, install_path)
        .join("validator")
        .join(platform.tag())
        .join("vnu-runtime-image")
        .join("bin")
        .join(platform.launcher_name())
}

fn expand_placeholders(value: &str, install_path: &Path) -> String {
    let install = install_path.to_string_lossy();
    INSTALL_PATH_PLACEHOLDERS
        .iter()
        .fold(value.to_string(), |acc, placeholder| acc.replace(placeholder, &install))
}

/// Pure resolution, without touching settings. Only an empty override counts
/// as absent; any other value is taken verbatim.
pub fn resolve(platform: PlatformFamily, install_path: &Path, user_override: Option<&str>) -> ExecutableLocation {
    match user_override.filter(|value| !value.is_empty()) {
        Some(value) => ExecutableLocation {
            path: PathBuf::from(expand_placeholders(value, &normalize_install_path(platform, install_path))),
            origin: ExecutableOrigin::UserConfigured,
        },
        None => ExecutableLocation {
            path: default_executable_path(platform, install_path),
            origin: ExecutableOrigin::DerivedDefault,
        },
    }
}

/// Resolves the executable for one platform and install directory, reading
/// and persisting the override through a [`ConfigurationSource`].
#[derive(Debug, Clone)]
pub struct Resolver {
    platform: PlatformFamily,
    install_path: PathBuf,
}

impl Resolver {
    pub fn new(platform: PlatformFamily, install_path: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            install_path: install_path.into(),
        }
    }

    /// Resolver for an OS name such as `std::env::consts::OS`
    pub fn for_os(os: &str, install_path: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        Ok(Self::new(PlatformFamily::from_os_name(os)?, install_path))
    }

    pub fn platform(&self) -> PlatformFamily {
        self.platform
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    /// Resolve the executable. A derived default is persisted as the new
    /// override; a persistence failure is logged and otherwise ignored.
    pub fn resolve<S: ConfigurationSource + ?Sized>(&self, settings: &S) -> ExecutableLocation {
        let user_override = settings.get(EXECUTABLE_PATH_KEY);
        let location = resolve(self.platform, &self.install_path, user_override.as_deref());

        if location.origin == ExecutableOrigin::DerivedDefault {
            let derived = location.path.to_string_lossy();
            match settings.set(EXECUTABLE_PATH_KEY, Some(derived.as_ref()), ConfigScope::Global) {
                Ok(()) => log::info!("Derived HTML checker path {derived}"),
                Err(e) => log::warn!("Failed to persist derived checker path {derived}: {e}"),
            }
        } else {
            log::debug!("Using configured HTML checker path {}", location.path.display());
        }

        location
    }

    /// Drop the stored override and resolve again from the layout convention.
    pub fn invalidate<S: ConfigurationSource + ?Sized>(&self, settings: &S) -> ExecutableLocation {
        if let Err(e) = settings.set(EXECUTABLE_PATH_KEY, None, ConfigScope::Global) {
            log::warn!("Failed to clear checker path override: {e}");
        }
        self.resolve(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    #[test]
    fn test_default_layout_posix() {
        let path = default_executable_path(PlatformFamily::Linux, Path::new("/home/u/.ext/htmlcheck"));
        assert_eq!(
            path,
            PathBuf::from("/home/u/.ext/htmlcheck/validator/linux/vnu-runtime-image/bin/vnu")
        );
    }

    #[test]
    fn test_default_layout_macos_uses_osx_tag() {
        let path = default_executable_path(PlatformFamily::MacOs, Path::new("/Applications/ext"));
        assert!(path.ends_with("validator/osx/vnu-runtime-image/bin/vnu"));
    }

    #[test]
    fn test_windows_strips_one_leading_separator() {
        let normalized = normalize_install_path(PlatformFamily::Windows, Path::new("/c:/Users/me/ext"));
        assert_eq!(normalized, PathBuf::from("c:/Users/me/ext"));

        let twice = normalize_install_path(PlatformFamily::Windows, Path::new("//server/share"));
        assert_eq!(twice, PathBuf::from("/server/share"));

        let path = default_executable_path(PlatformFamily::Windows, Path::new("/c:/Users/me/ext"));
        assert!(path.starts_with("c:/Users/me/ext"));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("vnu.bat"));
    }

    #[test]
    fn test_posix_keeps_leading_separator() {
        let normalized = normalize_install_path(PlatformFamily::Linux, Path::new("/opt/ext"));
        assert_eq!(normalized, PathBuf::from("/opt/ext"));
    }

    #[test]
    fn test_override_is_verbatim() {
        let location = resolve(PlatformFamily::Windows, Path::new("/c:/ext"), Some("/usr/bin/vnu"));
        assert_eq!(location.path, PathBuf::from("/usr/bin/vnu"));
        assert_eq!(location.origin, ExecutableOrigin::UserConfigured);
    }

    #[test]
    fn test_override_placeholders_expand() {
        let location = resolve(
            PlatformFamily::Linux,
            Path::new("/opt/ext"),
            Some("${extensionPath}/vnu.jar"),
        );
        assert_eq!(location.path, PathBuf::from("/opt/ext/vnu.jar"));

        let location = resolve(
            PlatformFamily::Linux,
            Path::new("/opt/ext"),
            Some("${workspaceFolder}/lib/vnu.jar"),
        );
        assert_eq!(location.path, PathBuf::from("/opt/ext/lib/vnu.jar"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let location = resolve(PlatformFamily::Linux, Path::new("/opt/ext"), Some(""));
        assert_eq!(location.origin, ExecutableOrigin::DerivedDefault);
    }

    #[test]
    fn test_whitespace_override_is_kept_verbatim() {
        let location = resolve(PlatformFamily::Linux, Path::new("/opt/ext"), Some("  "));
        assert_eq!(location.origin, ExecutableOrigin::UserConfigured);
        assert_eq!(location.path, PathBuf::from("  "));

        let settings = MemorySettings::new();
        settings.set(EXECUTABLE_PATH_KEY, Some(" "), ConfigScope::Global).unwrap();
        let location = Resolver::new(PlatformFamily::Linux, "/opt/ext").resolve(&settings);
        assert_eq!(location.origin, ExecutableOrigin::UserConfigured);
        assert_eq!(settings.get(EXECUTABLE_PATH_KEY).as_deref(), Some(" "));
    }

    #[test]
    fn test_derived_path_is_persisted() {
        let settings = MemorySettings::new();
        let resolver = Resolver::new(PlatformFamily::Linux, "/opt/ext");

        let first = resolver.resolve(&settings);
        assert_eq!(first.origin, ExecutableOrigin::DerivedDefault);
        assert_eq!(
            settings.get(EXECUTABLE_PATH_KEY).map(PathBuf::from),
            Some(first.path.clone())
        );

        let second = resolver.resolve(&settings);
        assert_eq!(second.origin, ExecutableOrigin::UserConfigured);
        assert_eq!(second.path, first.path);
    }

    #[test]
    fn test_invalidate_rederives() {
        let settings = MemorySettings::new();
        settings
            .set(EXECUTABLE_PATH_KEY, Some("/custom/vnu"), ConfigScope::Global)
            .unwrap();
        let resolver = Resolver::new(PlatformFamily::Linux, "/opt/ext");
        assert_eq!(resolver.resolve(&settings).path, PathBuf::from("/custom/vnu"));

        let location = resolver.invalidate(&settings);
        assert_eq!(location.origin, ExecutableOrigin::DerivedDefault);
        assert_eq!(location.path, default_executable_path(PlatformFamily::Linux, Path::new("/opt/ext")));
    }

    #[test]
    fn test_for_os_rejects_unknown_platform() {
        let err = Resolver::for_os("haiku", "/opt/ext").unwrap_err();
        assert_eq!(err, ResolveError::UnsupportedPlatform { os: "haiku".to_string() });
    }
}
