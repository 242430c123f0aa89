//! Running the checker for one document.
//!
//! Each request spawns exactly one subprocess. Both output streams are
//! buffered until the process exits: the JSON report spans the whole
//! diagnostic stream, so nothing is parsed line by line.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;

use crate::finding::ValidationOutcome;
use crate::resolver::ExecutableLocation;
use crate::translate::translate;

/// Arguments passed to the checker ahead of the target file
pub const CHECKER_ARGS: &[&str] = &["--format", "json", "--exit-zero-always"];

/// Java launcher used for `vnu.jar` when none is configured
pub const DEFAULT_JAVA: &str = "java";

/// One validation attempt for one document
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub file_path: PathBuf,
    pub executable: ExecutableLocation,
}

/// Why a validation request produced no outcome
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("HTML checker not found at {}. Check the executablePath setting.", path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("Failed to launch HTML checker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTML checker failed ({}): {stderr}", describe_exit(*exit_code))]
    ProcessExecution { exit_code: Option<i32>, stderr: String },

    #[error("Failed to parse validator output: {detail}")]
    OutputParse { detail: String, stdout: String },
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ValidationError {
    /// True for failures of the checker process itself, as opposed to
    /// unreadable output from a run that otherwise succeeded.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::ProcessExecution { .. })
    }
}

/// Program and arguments for one checker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CheckerCommand {
    /// Build the command line for `file_path`. A `.jar` executable runs
    /// through `java -jar`.
    pub fn new(executable: &Path, java: &str, file_path: &Path) -> Self {
        let mut args = Vec::with_capacity(CHECKER_ARGS.len() + 3);
        let is_jar = executable
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));

        let program = if is_jar {
            args.push("-jar".to_string());
            args.push(executable.to_string_lossy().into_owned());
            PathBuf::from(java)
        } else {
            executable.to_path_buf()
        };

        args.extend(CHECKER_ARGS.iter().map(|arg| arg.to_string()));
        args.push(file_path.to_string_lossy().into_owned());

        Self { program, args }
    }
}

/// Classify a finished checker process.
///
/// A parseable diagnostic stream is an outcome regardless of exit status.
/// Otherwise a signal, or a non-zero exit with something on the diagnostic
/// stream, is an execution failure. Everything else is an output parse failure.
pub fn interpret_output(exit_code: Option<i32>, stdout: &str, stderr: &str) -> Result<ValidationOutcome, ValidationError> {
    let outcome = translate(stderr);

    match outcome.parse_failure.clone() {
        None => {
            if exit_code != Some(0) {
                log::warn!(
                    "HTML checker reported findings but exited with {}",
                    describe_exit(exit_code)
                );
            }
            Ok(outcome)
        }
        Some(_) if crashed(exit_code, stderr) => Err(ValidationError::ProcessExecution {
            exit_code,
            stderr: stderr.to_string(),
        }),
        Some(detail) => Err(ValidationError::OutputParse {
            detail,
            stdout: stdout.to_string(),
        }),
    }
}

/// Killed by a signal, or a non-zero exit that left something on stderr
fn crashed(exit_code: Option<i32>, stderr: &str) -> bool {
    match exit_code {
        None => true,
        Some(code) => code != 0 && !stderr.trim().is_empty(),
    }
}

/// Spawns the checker and turns its output into a [`ValidationOutcome`]
#[derive(Debug, Clone)]
pub struct ValidationRunner {
    java: String,
}

impl Default for ValidationRunner {
    fn default() -> Self {
        Self::new(DEFAULT_JAVA)
    }
}

impl ValidationRunner {
    pub fn new(java: impl Into<String>) -> Self {
        Self { java: java.into() }
    }

    pub fn java(&self) -> &str {
        &self.java
    }

    /// Validate one document. Fails before spawning when the executable is
    /// not a regular file.
    pub async fn run(&self, request: &ValidationRequest) -> Result<ValidationOutcome, ValidationError> {
        let executable = &request.executable.path;
        if !executable.is_file() {
            return Err(ValidationError::ExecutableNotFound {
                path: executable.clone(),
            });
        }

        let command = CheckerCommand::new(executable, &self.java, &request.file_path);
        log::debug!(
            "Running {} {}",
            command.program.display(),
            command.args.join(" ")
        );

        let output = self.execute(&command).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        interpret_output(output.status.code(), &stdout, &stderr)
    }

    async fn execute(&self, command: &CheckerCommand) -> Result<Output, ValidationError> {
        let spawn_error = |source| ValidationError::Spawn {
            program: command.program.display().to_string(),
            source,
        };

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        child.wait_with_output().await.map_err(spawn_error)
    }
}
