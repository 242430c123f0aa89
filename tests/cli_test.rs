use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use serial_test::serial;
use tempfile::tempdir;

#[cfg(unix)]
mod common;

fn htmlcheck(settings: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.env("NO_COLOR", "1").arg("--settings").arg(settings);
    cmd
}

#[test]
#[serial]
fn test_help_lists_subcommands() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("server"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("locate"))
        .stdout(predicate::str::contains("toggle"));
}

#[test]
#[serial]
fn test_schema_describes_settings_file() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.arg("schema");

    let output = cmd.assert().success().get_output().stdout.clone();
    let schema: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let text = schema.to_string();
    assert!(text.contains("executablePath"));
    assert!(text.contains("enabled"));
}

#[test]
#[serial]
fn test_toggle_flips_and_persists() {
    let temp_dir = tempdir().unwrap();
    let settings = temp_dir.path().join("settings.toml");

    htmlcheck(&settings)
        .arg("toggle")
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML validation disabled"));
    assert!(fs::read_to_string(&settings).unwrap().contains("enabled = false"));

    htmlcheck(&settings)
        .arg("toggle")
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML validation enabled"));
}

#[test]
#[serial]
fn test_status_reports_settings_path() {
    let temp_dir = tempdir().unwrap();
    let settings = temp_dir.path().join("settings.toml");

    htmlcheck(&settings)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"))
        .stdout(predicate::str::contains(settings.display().to_string()));
}

#[test]
#[serial]
fn test_unreadable_settings_is_tool_error() {
    let temp_dir = tempdir().unwrap();
    let settings = temp_dir.path().join("settings.toml");
    fs::write(&settings, "[flags\nenabled = ").unwrap();

    htmlcheck(&settings).arg("toggle").assert().code(2);
}

#[test]
#[serial]
fn test_completions_list() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.args(["completions", "--list"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("htmlcheck"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
#[serial]
fn test_completions_for_named_shell() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.args(["completions", "bash"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("htmlcheck"))
        .stdout(predicate::str::contains("locate"));
}

#[test]
#[serial]
fn test_completions_without_detectable_shell() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.env("SHELL", "/usr/bin/not-a-shell").arg("completions");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("htmlcheck completions --list"));
}

#[test]
#[serial]
fn test_check_requires_files() {
    let mut cmd = cargo_bin_cmd!("htmlcheck");
    cmd.arg("check");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required arguments were not provided"));
}

#[test]
#[serial]
fn test_check_missing_executable_is_tool_error() {
    let temp_dir = tempdir().unwrap();
    let settings = temp_dir.path().join("settings.toml");
    let page = temp_dir.path().join("index.html");
    fs::write(&page, "<!DOCTYPE html>").unwrap();
    let missing = temp_dir.path().join("missing").join("vnu");

    htmlcheck(&settings)
        .arg("check")
        .arg("--executable")
        .arg(&missing)
        .arg(&page)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("HTML checker not found at"))
        .stderr(predicate::str::contains(missing.display().to_string()));
}

#[cfg(unix)]
mod with_checker {
    use super::*;
    use crate::common::{EMPTY_REPORT, FakeChecker, ONE_ERROR_REPORT, write_html};

    #[test]
    #[serial]
    fn test_check_errors_exit_one() {
        let checker = FakeChecker::new(ONE_ERROR_REPORT, 0);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        let page = write_html(temp_dir.path(), "a.html");

        htmlcheck(&settings)
            .arg("check")
            .arg("--executable")
            .arg(checker.executable())
            .arg(&page)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(format!("{}:5:10: error: bad tag", page.display())))
            .stdout(predicate::str::contains("1 error(s), 0 warning(s)"));
    }

    #[test]
    #[serial]
    fn test_check_clean_exits_zero() {
        let checker = FakeChecker::new(EMPTY_REPORT, 0);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        let page = write_html(temp_dir.path(), "a.html");

        htmlcheck(&settings)
            .arg("check")
            .arg("--executable")
            .arg(checker.executable())
            .arg(&page)
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 file: 0 error(s), 0 warning(s)"));

        // --executable is not written back
        let content = fs::read_to_string(&settings).unwrap_or_default();
        assert!(!content.contains("executablePath"));
    }

    #[test]
    #[serial]
    fn test_check_json_output() {
        let checker = FakeChecker::new(ONE_ERROR_REPORT, 0);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        let page = write_html(temp_dir.path(), "a.html");

        let output = htmlcheck(&settings)
            .arg("check")
            .args(["--output-format", "json"])
            .arg("--executable")
            .arg(checker.executable())
            .arg(&page)
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["errors"], 1);
        assert_eq!(report["findings"][0]["line"], 5);
        assert_eq!(report["findings"][0]["message"], "bad tag");
    }

    #[test]
    #[serial]
    fn test_check_quiet_reports_through_exit_code() {
        let checker = FakeChecker::new(ONE_ERROR_REPORT, 0);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        let page = write_html(temp_dir.path(), "a.html");

        htmlcheck(&settings)
            .arg("check")
            .arg("--quiet")
            .arg("--executable")
            .arg(checker.executable())
            .arg(&page)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    #[serial]
    fn test_check_respects_disabled_flag() {
        let checker = FakeChecker::new(ONE_ERROR_REPORT, 0);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        fs::write(&settings, "[flags]\nenabled = false\n").unwrap();
        let page = write_html(temp_dir.path(), "a.html");

        htmlcheck(&settings)
            .arg("check")
            .arg("--executable")
            .arg(checker.executable())
            .arg(&page)
            .assert()
            .success()
            .stderr(predicate::str::contains("disabled"));
        assert!(checker.calls().is_empty());
    }

    #[test]
    #[serial]
    fn test_check_uses_bundled_checker() {
        let checker = FakeChecker::installed(ONE_ERROR_REPORT);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");
        let page = write_html(temp_dir.path(), "a.html");

        htmlcheck(&settings)
            .arg("check")
            .arg("--install-path")
            .arg(checker.install_path())
            .arg(&page)
            .assert()
            .code(1);
        assert_eq!(checker.calls().len(), 1);
    }

    #[test]
    #[serial]
    fn test_locate_derives_then_reads_back() {
        let checker = FakeChecker::installed(EMPTY_REPORT);
        let temp_dir = tempdir().unwrap();
        let settings = temp_dir.path().join("settings.toml");

        htmlcheck(&settings)
            .arg("locate")
            .arg("--install-path")
            .arg(checker.install_path())
            .assert()
            .success()
            .stdout(predicate::str::contains(checker.executable().display().to_string()))
            .stdout(predicate::str::contains("(derived default)"));

        htmlcheck(&settings)
            .arg("locate")
            .arg("--install-path")
            .arg(checker.install_path())
            .assert()
            .success()
            .stdout(predicate::str::contains("(user-configured)"));

        htmlcheck(&settings)
            .arg("locate")
            .arg("--reset")
            .arg("--install-path")
            .arg(checker.install_path())
            .assert()
            .success()
            .stdout(predicate::str::contains("(derived default)"));
    }
}
