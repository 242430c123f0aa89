//! Platform detection for locating the bundled checker.
//!
//! The Nu Html Checker ships one runtime image per platform (`vnu.linux.zip`,
//! `vnu.osx.zip`, `vnu.windows.zip`). Each image unpacks into the same
//! `vnu-runtime-image/bin/` layout with a platform-specific launcher.

use std::fmt;

use crate::resolver::ResolveError;

/// Operating system family, which decides launcher naming and path quirks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Posix,
    Windows,
}

/// The platforms the checker publishes runtime images for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Linux,
    MacOs,
    Windows,
}

impl PlatformFamily {
    /// Platform of the running process
    pub fn current() -> Result<Self, ResolveError> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name (as reported by `std::env::consts::OS`) to a platform.
    pub fn from_os_name(os: &str) -> Result<Self, ResolveError> {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" | "win32" => Ok(Self::Windows),
            _ => Err(ResolveError::UnsupportedPlatform { os: os.to_string() }),
        }
    }

    /// Tag used in release archive names and the install layout
    pub fn tag(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "osx",
            Self::Windows => "windows",
        }
    }

    pub fn os_family(self) -> OsFamily {
        match self {
            Self::Linux | Self::MacOs => OsFamily::Posix,
            Self::Windows => OsFamily::Windows,
        }
    }

    /// File name of the checker launcher inside `vnu-runtime-image/bin/`
    pub fn launcher_name(self) -> &'static str {
        match self.os_family() {
            OsFamily::Posix => "vnu",
            OsFamily::Windows => "vnu.bat",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
