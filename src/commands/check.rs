//! Handler for the `check` command.

use colored::*;

use htmlcheck_lib::exit_codes::exit;
use htmlcheck_lib::finding::ValidationOutcome;
use htmlcheck_lib::output::{OutputFormat, OutputFormatter, OutputWriter, TextFormatter, format_all_outcomes_as_json};
use htmlcheck_lib::platform::PlatformFamily;
use htmlcheck_lib::resolver::{self, Resolver};
use htmlcheck_lib::runner::{DEFAULT_JAVA, ValidationRequest, ValidationRunner};
use htmlcheck_lib::settings::{ConfigurationSource, ENABLED_FLAG, FlagStore, JAVA_PATH_KEY};

use crate::cli_types::CheckArgs;

/// Validate each file once and exit with a code reflecting the results.
pub fn handle_check(args: CheckArgs, settings_path: Option<&str>) {
    let output_format: OutputFormat = args.output_format.parse().unwrap_or_else(|e| {
        eprintln!("{}: {e}", "Error".red().bold());
        exit::tool_error();
    });
    let writer = OutputWriter::new(args.quiet);
    let settings = super::open_settings(settings_path);

    if !settings.get_flag(ENABLED_FLAG).unwrap_or(true) {
        if !args.quiet {
            eprintln!("HTML validation is disabled. Run `htmlcheck toggle` to enable it.");
        }
        exit::success();
    }

    let platform = PlatformFamily::current().unwrap_or_else(|e| {
        eprintln!("{}: {e}", "Error".red().bold());
        exit::tool_error();
    });
    let install_path = super::install_path(args.install_path.as_deref());

    // An explicit --executable applies to this run only
    let executable = match args.executable.as_deref() {
        Some(executable) => resolver::resolve(platform, &install_path, Some(executable)),
        None => Resolver::new(platform, &install_path).resolve(&settings),
    };
    log::debug!("Using HTML checker {} ({})", executable.path.display(), executable.origin);

    let java = settings.get(JAVA_PATH_KEY).unwrap_or_else(|| DEFAULT_JAVA.to_string());
    let runner = ValidationRunner::new(java);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("{}: Failed to create Tokio runtime: {}", "Error".red().bold(), e);
        exit::tool_error();
    });

    let mut outcomes: Vec<(String, ValidationOutcome)> = Vec::new();
    let mut tool_failures = 0usize;

    runtime.block_on(async {
        for file in &args.files {
            let request = ValidationRequest {
                file_path: file.into(),
                executable: executable.clone(),
            };

            match runner.run(&request).await {
                Ok(outcome) => outcomes.push((file.clone(), outcome)),
                Err(e) => {
                    tool_failures += 1;
                    log::error!("Failed to validate {file}: {e}");
                    let _ = writer.write_error(&format!("{}: {file}: {e}", "Error".red().bold()));
                }
            }
        }
    });

    let total_errors: usize = outcomes.iter().map(|(_, outcome)| outcome.error_count).sum();
    let total_warnings: usize = outcomes.iter().map(|(_, outcome)| outcome.warning_count).sum();

    match output_format {
        OutputFormat::Json => {
            let _ = writer.writeln(&format_all_outcomes_as_json(&outcomes));
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new();
            for (file, outcome) in &outcomes {
                let _ = writer.writeln(&formatter.format_outcome(outcome, file));
            }
            if let Some(summary) = formatter.format_summary(outcomes.len(), total_errors, total_warnings) {
                let _ = writer.writeln(&summary);
            }
        }
    }

    if tool_failures > 0 {
        exit::tool_error();
    }
    if total_errors > 0 {
        exit::errors_found();
    }
    exit::success();
}
