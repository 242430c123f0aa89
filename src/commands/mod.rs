//! Command handlers for the htmlcheck CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod check;
pub mod completions;
pub mod locate;
pub mod schema;
pub mod server;
pub mod status;
pub mod toggle;

use std::path::PathBuf;

use colored::*;

use htmlcheck_lib::exit_codes::exit;
use htmlcheck_lib::session::SessionEnvironment;
use htmlcheck_lib::settings::FileSettings;

/// Open the settings file named on the command line, or the default one.
/// Exits with a tool error when it cannot be read.
pub fn open_settings(path: Option<&str>) -> FileSettings {
    let opened = match path {
        Some(path) => FileSettings::open(path),
        None => FileSettings::open_default(),
    };

    opened.unwrap_or_else(|e| {
        eprintln!("{}: {e}", "Error".red().bold());
        exit::tool_error();
    })
}

/// The install path given on the command line, or the binary's directory
pub fn install_path(path: Option<&str>) -> PathBuf {
    path.map(PathBuf::from)
        .unwrap_or_else(SessionEnvironment::default_install_path)
}
