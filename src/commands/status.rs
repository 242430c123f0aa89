//! Handler for the `status` command.

use colored::*;

use htmlcheck_lib::platform::PlatformFamily;
use htmlcheck_lib::resolver;
use htmlcheck_lib::settings::{ConfigurationSource, ENABLED_FLAG, EXECUTABLE_PATH_KEY, FlagStore, JAVA_PATH_KEY};

/// Print the enabled flag, settings file and checker location.
///
/// Unlike `locate`, this never writes a derived path back to the settings.
pub fn handle_status(settings_path: Option<&str>) {
    let settings = super::open_settings(settings_path);
    let enabled = settings.get_flag(ENABLED_FLAG).unwrap_or(true);

    println!(
        "Validation:  {}",
        if enabled { "enabled".green() } else { "disabled".yellow() }
    );
    println!("Settings:    {}", settings.path().display());

    let platform = match PlatformFamily::current() {
        Ok(platform) => platform,
        Err(e) => {
            println!("Platform:    {}", e.to_string().red());
            return;
        }
    };
    println!("Platform:    {platform}");

    let override_path = settings.get(EXECUTABLE_PATH_KEY);
    let location = resolver::resolve(platform, &super::install_path(None), override_path.as_deref());
    let presence = if location.path.is_file() {
        "found".green()
    } else {
        "missing".red()
    };
    println!(
        "Executable:  {} ({}, {presence})",
        location.path.display(),
        location.origin
    );

    if let Some(java) = settings.get(JAVA_PATH_KEY) {
        println!("Java:        {java}");
    }
}
