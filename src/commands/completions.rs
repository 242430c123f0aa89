//! Handler for the `completions` command.

use clap::{CommandFactory, ValueEnum};
use clap_complete::{Shell, generate};
use colored::*;
use std::io::stdout;

use htmlcheck_lib::exit_codes::exit;

const BIN_NAME: &str = "htmlcheck";

/// Print the completion script for `shell`, or for the shell named by `$SHELL`.
pub fn handle_completions(shell: Option<Shell>, list: bool) {
    if list {
        println!("Shells {BIN_NAME} can generate completions for:");
        for name in shell_names() {
            println!("  {name}");
        }
        return;
    }

    let Some(shell) = shell.or_else(Shell::from_env) else {
        eprintln!(
            "{}: $SHELL does not name a supported shell. Pass one explicitly, e.g. `{BIN_NAME} completions bash`, or see `{BIN_NAME} completions --list`.",
            "Error".red().bold()
        );
        exit::tool_error();
    };

    log::debug!("Generating {shell} completions");
    generate(shell, &mut crate::Cli::command(), BIN_NAME, &mut stdout());
}

fn shell_names() -> Vec<String> {
    Shell::value_variants()
        .iter()
        .filter_map(|shell| shell.to_possible_value())
        .map(|value| value.get_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_names_cover_every_variant() {
        let names = shell_names();
        assert_eq!(names.len(), Shell::value_variants().len());
        assert!(names.iter().any(|name| name == "bash"));
        assert!(names.iter().any(|name| name == "powershell"));
    }
}
