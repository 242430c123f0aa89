use clap::{Parser, Subcommand};
use clap_complete::Shell;

mod cli_types;
mod commands;

use cli_types::{CheckArgs, LocateArgs};

#[derive(Parser)]
#[command(
    name = "htmlcheck",
    author,
    version,
    about = "Validate HTML with the Nu Html Checker from the command line or an editor",
    long_about = None
)]
pub struct Cli {
    /// Settings file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    settings: Option<String>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Language Server Protocol server
    Server {
        /// TCP port to listen on (stdio is used when omitted)
        #[arg(long)]
        port: Option<u16>,

        /// Use stdio for communication (default)
        #[arg(long)]
        stdio: bool,
    },
    /// Validate HTML files once
    Check(CheckArgs),
    /// Print the resolved checker executable
    Locate(LocateArgs),
    /// Turn validation on or off
    Toggle,
    /// Show the current validation settings
    Status,
    /// Print the JSON schema of the settings file
    Schema,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (detected from $SHELL if omitted)
        shell: Option<Shell>,

        /// List available shells
        #[arg(long)]
        list: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the LSP transport, so logs always go to stderr
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    let settings = cli.settings.as_deref();

    match cli.command {
        Commands::Server { port, stdio } => {
            commands::server::handle_server(port, stdio, cli.verbose, cli.settings.clone())
        }
        Commands::Check(args) => commands::check::handle_check(args, settings),
        Commands::Locate(args) => commands::locate::handle_locate(args, settings),
        Commands::Toggle => commands::toggle::handle_toggle(settings),
        Commands::Status => commands::status::handle_status(settings),
        Commands::Schema => commands::schema::handle_schema(),
        Commands::Completions { shell, list } => commands::completions::handle_completions(shell, list),
    }
}
