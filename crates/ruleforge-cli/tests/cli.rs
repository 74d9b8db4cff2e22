// crates/ruleforge-cli/tests/cli.rs
// ============================================================================
// Module: CLI Binary Tests
// Description: Integration tests that run the `ruleforge` binary.
// Purpose: Pin exit codes and output of commands that need no live backend.
// Dependencies: ruleforge-cli binary, tempfile
// ============================================================================

//! ## Overview
//! Runs the compiled binary against temporary config files. The backend URL
//! points at a closed local port, so gated pages exercise the fail-closed
//! gate and offline commands exercise config and link rendering.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Backend origin with nothing listening.
const CLOSED_BACKEND: &str = "http://127.0.0.1:1";

fn ruleforge_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ruleforge"))
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("ruleforge.toml");
    fs::write(&path, body.trim()).expect("write config");
    path
}

fn offline_config(dir: &TempDir) -> PathBuf {
    write_config(
        dir,
        &format!(
            r#"
[api]
base_url = "{CLOSED_BACKEND}/"
timeout_ms = 2000

[analyst]
name = "casey"
"#
        ),
    )
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(ruleforge_bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RULEFORGE_CONFIG")
        .env_remove("RULEFORGE_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("run ruleforge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Verifies `config show` prints the normalized effective configuration.
#[test]
fn config_show_prints_effective_toml() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let output = run(&config, &["config", "show"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains(&format!("base_url = \"{CLOSED_BACKEND}\"")), "stdout: {text}");
    assert!(text.contains("name = \"casey\""), "stdout: {text}");
    assert!(text.contains("page_size = 10"), "stdout: {text}");
}

/// Verifies `config validate` reports the file it read in JSON mode.
#[test]
fn config_validate_reports_source_as_json() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let output = run(&config, &["config", "validate", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json stdout");
    assert_eq!(value["valid"], serde_json::Value::Bool(true));
    let source = value["source"].as_str().expect("source path");
    assert!(source.ends_with("ruleforge.toml"), "source: {source}");
}

/// Verifies invalid configuration fails before any command runs.
#[test]
fn invalid_config_exits_with_failure() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(&dir, "[dashboard]\npage_size = 0\n");
    let output = run(&config, &["gate"]);
    assert_eq!(output.status.code(), Some(1));
    let message = stderr(&output);
    assert!(message.contains("Failed to load configuration"), "stderr: {message}");
    assert!(message.contains("dashboard.page_size"), "stderr: {message}");
}

/// Verifies an explicitly named missing config file is an error.
#[test]
fn missing_explicit_config_exits_with_failure() {
    let dir = TempDir::new().expect("temp dir");
    let output = run(&dir.path().join("absent.toml"), &["config", "show"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load configuration"));
}

// ============================================================================
// SECTION: Offline Commands
// ============================================================================

/// Verifies export links are printed without contacting the backend.
#[test]
fn export_prints_download_links() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let violations = run(&config, &["export", "violations"]);
    assert!(violations.status.success(), "stderr: {}", stderr(&violations));
    assert_eq!(stdout(&violations).trim(), format!("{CLOSED_BACKEND}/api/export/violations"));

    let report = run(&config, &["export", "report", "--format", "json"]);
    assert!(report.status.success(), "stderr: {}", stderr(&report));
    let value: serde_json::Value = serde_json::from_str(&stdout(&report)).expect("json stdout");
    assert_eq!(value["url"], format!("{CLOSED_BACKEND}/api/export/report"));
}

/// Verifies `--version` prints the package version.
#[test]
fn version_flag_prints_version() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let output = run(&config, &["--version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), format!("ruleforge {}", env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Verifies an unreachable backend locks the gate without failing `gate`.
#[test]
fn gate_reports_locked_when_backend_is_unreachable() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let output = run(&config, &["gate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Gate: locked"), "stdout: {text}");
    assert!(text.contains("locked (run a scan at /scan-now)"), "stdout: {text}");
}

/// Verifies gated pages exit with the locked code while the gate is closed.
#[test]
fn gated_pages_exit_locked_when_backend_is_unreachable() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    for args in [
        &["dashboard"][..],
        &["vault"][..],
        &["violations", "list"][..],
        &["versions", "list"][..],
        &["audit"][..],
        &["live", "--once"][..],
    ] {
        let output = run(&config, args);
        assert_eq!(output.status.code(), Some(2), "{args:?} stderr: {}", stderr(&output));
        assert!(stderr(&output).contains("is locked until a scan produces rules"));
        assert!(stdout(&output).is_empty(), "{args:?} wrote to stdout");
    }
}

// ============================================================================
// SECTION: Scan
// ============================================================================

/// Verifies extraction phases refuse to start without a document.
#[test]
fn scan_without_document_fails_before_contacting_backend() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let output = run(&config, &["scan", "--phase", "1"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("[ERROR] phase 1 requires a PDF document"), "stdout: {text}");
    assert!(stderr(&output).contains("Scan failed."));
}

/// Verifies non-PDF documents are rejected.
#[test]
fn scan_rejects_non_pdf_documents() {
    let dir = TempDir::new().expect("temp dir");
    let config = offline_config(&dir);
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not a pdf").expect("write notes");
    let output = run(&config, &["scan", "--pdf", notes.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("only PDF files are supported"), "stderr: {}", stderr(&output));
}
