// crates/directive-gate-cli/tests/metrics_commands.rs
// ============================================================================
// Module: CLI Metrics Command Tests
// Description: Integration tests for single-metric computations.
// Purpose: Ensure metric commands emit canonical JSON and fail closed on bad input.
// Dependencies: directive-gate-cli binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Runs each `metrics` subcommand against a JSON input file and checks the
//! computed values under default and overridden policy constants.

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
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Path to the compiled CLI binary.
fn directive_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_directive-gate"))
}

/// Runs `metrics <metric> --input <file>` with optional extra args.
fn run_metric(dir: &TempDir, metric: &str, input: &Value, extra: &[&str]) -> Output {
    let path = dir.path().join(format!("{metric}.json"));
    fs::write(&path, serde_json::to_vec(input).expect("encode input")).expect("write input");
    Command::new(directive_gate_bin())
        .current_dir(dir.path())
        .env_remove("DIRECTIVE_GATE_CONFIG")
        .args(["metrics", metric, "--input", path.to_string_lossy().as_ref()])
        .args(extra)
        .output()
        .expect("run directive-gate")
}

/// Parses stdout as JSON.
fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("json output")
}

/// Reads a numeric JSON field.
fn number(value: &Value) -> f64 {
    value.as_f64().expect("number")
}

/// Per-order cost fields with contribution 625.
fn order_inputs() -> Value {
    json!({
        "price": 1000,
        "cogs": 200,
        "variable_labor": 100,
        "packaging": 25,
        "shipping": 30,
        "fees": 20,
        "refund_allowance": 0
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Contribution subtracts every cost from price.
#[test]
fn cli_metrics_contribution() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_metric(&dir, "contribution", &order_inputs(), &[]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result = stdout_json(&output);
    assert!((number(&result["contribution"]) - 625.0).abs() < 1e-9);
    assert!((number(&result["margin"]) - 0.625).abs() < 1e-9);
}

/// LTV sums the repeat profile and applies the default discount.
#[test]
fn cli_metrics_ltv() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({
        "inputs": order_inputs(),
        "repeat_profile": [
            {"order_index": 1, "probability": 1.0, "month_offset": 0},
            {"order_index": 2, "probability": 1.0, "month_offset": 3},
            {"order_index": 3, "probability": 1.0, "month_offset": 6}
        ],
        "horizon_months": 12
    });
    let output = run_metric(&dir, "ltv", &input, &[]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result = stdout_json(&output);
    assert_eq!(result["expected_orders"].as_array().map(Vec::len), Some(3));
    assert!((number(&result["ltv"]["raw"]) - 1875.0).abs() < 1e-9);
    assert!((number(&result["ltv"]["usable"]) - 1500.0).abs() < 1e-9);
}

/// CAC reports blended and risk-buffered values.
#[test]
fn cli_metrics_cac() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({
        "costs": {"paid": 800, "allocated": 250, "labor": 200},
        "new_customers": 10
    });
    let output = run_metric(&dir, "cac", &input, &[]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result = stdout_json(&output);
    assert!((number(&result["cac"]["total_cost"]) - 1250.0).abs() < 1e-9);
    assert!((number(&result["cac"]["blended"]) - 125.0).abs() < 1e-9);
    assert!((number(&result["cac"]["usable"]) - 150.0).abs() < 1e-9);
}

/// Zero new customers is a division by zero and exits 1.
#[test]
fn cli_metrics_cac_zero_customers_fails() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({
        "costs": {"paid": 800, "allocated": 250, "labor": 200},
        "new_customers": 0
    });
    let output = run_metric(&dir, "cac", &input, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Metric computation failed"), "unexpected stderr: {stderr}");
}

/// The guardrail threshold follows the configured policy.
#[test]
fn cli_metrics_guardrail_uses_config_policy() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({"usable_ltv": 1500.0, "usable_cac": 150.0});

    let output = run_metric(&dir, "guardrail", &input, &[]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert!((number(&result["ratio"]) - 10.0).abs() < 1e-9);
    assert_eq!(result["passes"], json!(false));
    assert!((number(&result["max_allowable_cac"]) - 125.0).abs() < 1e-9);

    let config = dir.path().join("policy.toml");
    fs::write(&config, "[policy]\nguardrail_ratio = 3.0\n").expect("write config");
    let output =
        run_metric(&dir, "guardrail", &input, &["--config", config.to_string_lossy().as_ref()]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["passes"], json!(true));
    assert!((number(&result["threshold"]) - 3.0).abs() < 1e-9);
}

/// An order profile expands labor and fees into a contribution.
#[test]
fn cli_metrics_order_profile() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({
        "price": 100,
        "cogs": 20,
        "packaging": 5,
        "shipping": 10,
        "fee_rate": 0.03,
        "fee_fixed": 0.3,
        "labor_minutes": 30,
        "labor_rate": 40
    });
    let output = run_metric(&dir, "order-profile", &input, &[]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result = stdout_json(&output);
    assert!((number(&result["contribution"]["contribution"]) - 41.7).abs() < 1e-9);
}

/// Unknown metric input fields are rejected.
#[test]
fn cli_metrics_rejects_unknown_fields() {
    let dir = TempDir::new().expect("temp dir");
    let input = json!({"usable_ltv": 1500.0, "usable_cac": 150.0, "margin": 0.4});
    let output = run_metric(&dir, "guardrail", &input, &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse metric input JSON"), "unexpected stderr: {stderr}");
}
