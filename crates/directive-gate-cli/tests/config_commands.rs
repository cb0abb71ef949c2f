// crates/directive-gate-cli/tests/config_commands.rs
// ============================================================================
// Module: CLI Config Command Tests
// Description: Integration tests for config and directive catalog commands.
// Purpose: Ensure config validation reports success and fails closed on errors.
// Dependencies: directive-gate-cli binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Runs the CLI binary for config validation, the example config, and the
//! directive listing, and ensures invalid configuration fails closed with
//! explicit errors.
//!
//! Security posture: configuration inputs are untrusted; validation must fail closed.

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

use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Path to the compiled CLI binary.
fn directive_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_directive-gate"))
}

/// Runs the binary inside `dir` with no config override from the environment.
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(directive_gate_bin())
        .current_dir(dir)
        .env_remove("DIRECTIVE_GATE_CONFIG")
        .args(args)
        .output()
        .expect("run directive-gate")
}

// ============================================================================
// SECTION: Config Validate
// ============================================================================

/// Verifies config validation succeeds for a valid policy override.
#[test]
fn cli_config_validate_accepts_valid_config() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("directive-gate.toml");
    fs::write(&config_path, "[policy]\nguardrail_ratio = 3.0\n").expect("write config");

    let output =
        run(dir.path(), &["config", "validate", "--config", config_path.to_string_lossy().as_ref()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config valid"), "unexpected stdout: {stdout}");
}

/// Verifies the default file name is picked up from the working directory.
#[test]
fn cli_config_validate_reads_default_file() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("directive-gate.toml"), "[policy]\ncac_risk_buffer = 0.5\n")
        .expect("write config");

    let output = run(dir.path(), &["config", "validate"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cac_risk_buffer"), "unexpected stderr: {stderr}");
}

/// Verifies validation without any config file falls back to defaults.
#[test]
fn cli_config_validate_without_file_uses_defaults() {
    let dir = TempDir::new().expect("temp dir");

    let output = run(dir.path(), &["config", "validate"]);

    assert!(output.status.success());
}

/// Verifies config validation fails closed on unknown sections.
#[test]
fn cli_config_validate_rejects_unknown_section() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("directive-gate.toml");
    fs::write(&config_path, "[server]\nbind = \"127.0.0.1:0\"\n").expect("write config");

    let output =
        run(dir.path(), &["config", "validate", "--config", config_path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config parse error"), "unexpected stderr: {stderr}");
}

// ============================================================================
// SECTION: Config Example
// ============================================================================

/// Verifies the printed example validates as-is.
#[test]
fn cli_config_example_validates() {
    let dir = TempDir::new().expect("temp dir");

    let output = run(dir.path(), &["config", "example"]);
    assert!(output.status.success());
    let example = String::from_utf8_lossy(&output.stdout).into_owned();
    assert!(example.contains("[definitions]"));
    assert!(example.contains("[policy]"));

    let config_path = dir.path().join("example.toml");
    fs::write(&config_path, example).expect("write example");
    let output =
        run(dir.path(), &["config", "validate", "--config", config_path.to_string_lossy().as_ref()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

// ============================================================================
// SECTION: Directives
// ============================================================================

/// Verifies the builtin catalog lists in declared order.
#[test]
fn cli_directives_list_text() {
    let dir = TempDir::new().expect("temp dir");

    let output = run(dir.path(), &["directives", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().next(), Some("define_ltv_model [Gate 0]: Define LTV model"));
    assert!(stdout.contains("optimize_scaling_strategy"));
}

/// Verifies JSON listing returns every builtin directive.
#[test]
fn cli_directives_list_json() {
    let dir = TempDir::new().expect("temp dir");

    let output = run(dir.path(), &["directives", "list", "--format", "json"]);

    assert!(output.status.success());
    let directives: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(directives.as_array().map(Vec::len), Some(10));
}

/// Verifies `--version` prints the package version.
#[test]
fn cli_version_flag() {
    let dir = TempDir::new().expect("temp dir");

    let output = run(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("directive-gate "), "unexpected stdout: {stdout}");
}
