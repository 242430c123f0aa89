//! Handler for the `server` command.

use colored::*;

use htmlcheck_lib::exit_codes::exit;

/// Handle the server command: start the LSP server.
pub fn handle_server(port: Option<u16>, stdio: bool, verbose: bool, settings: Option<String>) {
    // Logging is already initialized in main(); verbose only raises the level
    if verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    if let Some(settings_path) = &settings
        && !std::path::Path::new(settings_path).exists()
    {
        // A missing file is created on first write
        log::info!("Settings file {settings_path} does not exist yet");
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("{}: Failed to create Tokio runtime: {}", "Error".red().bold(), e);
        exit::tool_error();
    });

    runtime.block_on(async {
        if let Some(port) = port {
            if let Err(e) = htmlcheck_lib::lsp::start_tcp_server(port, settings.as_deref()).await {
                eprintln!("Failed to start LSP server on port {port}: {e}");
                exit::tool_error();
            }
        } else {
            // stdio is the default transport; the flag exists for editors that pass it
            let _ = stdio;
            if let Err(e) = htmlcheck_lib::lsp::start_server(settings.as_deref()).await {
                eprintln!("Failed to start LSP server: {e}");
                exit::tool_error();
            }
        }
    });
}
