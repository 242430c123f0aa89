//! Shared helpers for integration tests: a scripted stand-in for `vnu`.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use htmlcheck_lib::platform::PlatformFamily;
use htmlcheck_lib::resolver::default_executable_path;
use tempfile::TempDir;

pub const EMPTY_REPORT: &str = r#"{"messages":[]}"#;

pub const ONE_ERROR_REPORT: &str =
    r#"{"messages":[{"type":"error","lastLine":5,"lastColumn":10,"message":"bad tag"}]}"#;

pub const ONE_WARNING_REPORT: &str = r#"{"messages":[{"type":"info","subType":"warning","lastLine":1,"lastColumn":1,"message":"Consider adding a lang attribute"}]}"#;

/// A shell script that records its arguments, prints a canned report on
/// stderr and exits with a fixed code.
pub struct FakeChecker {
    dir: TempDir,
    executable: PathBuf,
}

impl FakeChecker {
    /// Script placed directly in a temporary directory
    pub fn new(report: &str, exit_code: i32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let executable = dir.path().join("vnu");
        let checker = Self { dir, executable };
        checker.install(report, exit_code);
        checker
    }

    /// Script placed where the bundled checker lives below an install path
    pub fn installed(report: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let platform = PlatformFamily::current().unwrap();
        let executable = default_executable_path(platform, dir.path());
        fs::create_dir_all(executable.parent().unwrap()).unwrap();
        let checker = Self { dir, executable };
        checker.install(report, 0);
        checker
    }

    /// Rewrite the script with a new report and exit code
    pub fn install(&self, report: &str, exit_code: i32) {
        self.set_report(report);
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> \"{calls}\"\ncat \"{report}\" >&2\nexit {exit_code}\n",
            calls = self.calls_path().display(),
            report = self.report_path().display(),
        );
        fs::write(&self.executable, script).unwrap();
        fs::set_permissions(&self.executable, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Script whose n-th run sleeps for `runs[n].1` seconds before printing
    /// `runs[n].0`, so concurrent runs can finish out of order
    pub fn sequenced(runs: &[(&str, u32)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let executable = dir.path().join("vnu");
        let checker = Self { dir, executable };
        for (index, (report, delay)) in runs.iter().enumerate() {
            let run = index + 1;
            fs::write(checker.dir.path().join(format!("report.{run}.json")), report).unwrap();
            fs::write(checker.dir.path().join(format!("delay.{run}")), delay.to_string()).unwrap();
        }
        // mkdir is atomic, so each run claims a distinct slot
        let script = format!(
            "#!/bin/sh\nn=1\nwhile ! mkdir \"{root}/slot.$n\" 2>/dev/null; do n=$((n+1)); done\n\
             printf '%s\\n' \"$*\" >> \"{calls}\"\nsleep \"$(cat \"{root}/delay.$n\")\"\n\
             cat \"{root}/report.$n.json\" >&2\nexit 0\n",
            root = checker.dir.path().display(),
            calls = checker.calls_path().display(),
        );
        fs::write(&checker.executable, script).unwrap();
        fs::set_permissions(&checker.executable, fs::Permissions::from_mode(0o755)).unwrap();
        checker
    }

    /// Replace the report printed by later runs
    pub fn set_report(&self, report: &str) {
        fs::write(self.report_path(), report).unwrap();
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Root of the temporary tree, usable as an install path
    pub fn install_path(&self) -> &Path {
        self.dir.path()
    }

    /// Argument lines of every invocation so far
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_path())
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn calls_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    fn report_path(&self) -> PathBuf {
        self.dir.path().join("report.json")
    }
}

/// Write an HTML file into `dir` and return its path
pub fn write_html(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "<!DOCTYPE html><html lang=\"en\"><title>t</title></html>\n").unwrap();
    path
}
