//! Handler for the `toggle` command.

use colored::*;

use htmlcheck_lib::exit_codes::exit;
use htmlcheck_lib::settings::{ENABLED_FLAG, FlagStore};

/// Flip the persisted enabled flag and print the new state.
pub fn handle_toggle(settings_path: Option<&str>) {
    let settings = super::open_settings(settings_path);
    let enabled = !settings.get_flag(ENABLED_FLAG).unwrap_or(true);

    if let Err(e) = settings.set_flag(ENABLED_FLAG, enabled) {
        eprintln!("{}: {e}", "Error".red().bold());
        exit::tool_error();
    }

    if enabled {
        println!("HTML validation {}", "enabled".green());
    } else {
        println!("HTML validation {}", "disabled".yellow());
    }
}
