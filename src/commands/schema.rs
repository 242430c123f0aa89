//! Handler for the `schema` command.

use colored::*;
use schemars::schema_for;

use htmlcheck_lib::exit_codes::exit;
use htmlcheck_lib::settings::SettingsFile;

/// Print the JSON schema of the settings file.
pub fn handle_schema() {
    let schema = schema_for!(SettingsFile);

    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        eprintln!("{}: Failed to serialize schema: {}", "Error".red().bold(), e);
        exit::tool_error();
    });

    println!("{schema_json}");
}
