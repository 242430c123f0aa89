//! Language Server Protocol implementation for htmlcheck
//!
//! Editors connect to `htmlcheck server` and receive the checker's findings
//! as diagnostics, plus a `htmlcheck/status` notification for their status
//! indicator.

pub mod host;
pub mod server;
pub mod types;

pub use host::LspHost;
pub use server::HtmlCheckLanguageServer;
pub use types::{HtmlCheckLspConfig, StatusNotification, StatusParams, finding_to_diagnostic};

use anyhow::Result;
use tokio::net::TcpListener;
use tower_lsp::{LspService, Server};

/// Start the Language Server Protocol server on stdio
pub async fn start_server(settings_path: Option<&str>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let settings_path = settings_path.map(String::from);
    let (service, socket) =
        LspService::new(move |client| HtmlCheckLanguageServer::with_settings_path(client, settings_path));

    log::info!("Starting htmlcheck Language Server Protocol server");

    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

/// Start the LSP server over TCP (useful for debugging)
pub async fn start_tcp_server(port: u16, settings_path: Option<&str>) -> Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    log::info!("htmlcheck LSP server listening on 127.0.0.1:{port}");

    loop {
        let (stream, _) = listener.accept().await?;
        let settings_path = settings_path.map(String::from);
        let (service, socket) =
            LspService::new(move |client| HtmlCheckLanguageServer::with_settings_path(client, settings_path));

        tokio::spawn(async move {
            let (read, write) = tokio::io::split(stream);
            Server::new(read, write, socket).serve(service).await;
        });
    }
}
