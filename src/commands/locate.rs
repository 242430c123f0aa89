//! Handler for the `locate` command.

use colored::*;

use htmlcheck_lib::exit_codes::exit;
use htmlcheck_lib::platform::PlatformFamily;
use htmlcheck_lib::resolver::Resolver;

use crate::cli_types::LocateArgs;

/// Print the resolved checker executable and where the path came from.
pub fn handle_locate(args: LocateArgs, settings_path: Option<&str>) {
    let settings = super::open_settings(settings_path);
    let platform = PlatformFamily::current().unwrap_or_else(|e| {
        eprintln!("{}: {e}", "Error".red().bold());
        exit::tool_error();
    });

    let resolver = Resolver::new(platform, super::install_path(args.install_path.as_deref()));
    let location = if args.reset {
        resolver.invalidate(&settings)
    } else {
        resolver.resolve(&settings)
    };

    println!("{} ({})", location.path.display(), location.origin);
    if !location.path.is_file() {
        eprintln!(
            "{}: no executable exists at {}",
            "Warning".yellow().bold(),
            location.path.display()
        );
    }
}
