//! Policy constant validation tests for directive-gate-config.
// crates/directive-gate-config/tests/policy_validation.rs
// =============================================================================
// Module: Policy Config Validation Tests
// Description: Range checks for policy constants and audit settings.
// Purpose: Ensure out-of-range thresholds fail closed.
// =============================================================================

use directive_gate_config::DirectiveGateConfig;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::config_from_toml;
use common::minimal_config;

/// Parses a TOML snippet into a config.
fn parse(toml_str: &str) -> Result<DirectiveGateConfig, String> {
    config_from_toml(toml_str).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Policy Ranges
// ============================================================================

#[test]
fn defaults_validate() -> TestResult {
    let config = minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn zero_guardrail_ratio_is_rejected() -> TestResult {
    let config = parse("[policy]\nguardrail_ratio = 0.0\n")?;
    assert_invalid(config.validate(), "guardrail_ratio")
}

#[test]
fn discount_factor_above_one_is_rejected() -> TestResult {
    let config = parse("[policy]\nltv_discount_factor = 1.2\n")?;
    assert_invalid(config.validate(), "ltv_discount_factor")
}

#[test]
fn risk_buffer_below_one_is_rejected() -> TestResult {
    let config = parse("[policy]\ncac_risk_buffer = 0.9\n")?;
    assert_invalid(config.validate(), "cac_risk_buffer")
}

#[test]
fn capacity_bound_must_be_positive() -> TestResult {
    let config = parse("[policy]\nmax_capacity_utilization = 0.0\n")?;
    assert_invalid(config.validate(), "max_capacity_utilization")
}

#[test]
fn boundary_values_are_accepted() -> TestResult {
    let config = parse(
        "[policy]\nltv_discount_factor = 1.0\ncac_risk_buffer = 1.0\nmax_capacity_utilization = \
         1.0\nguardrail_ratio = 3.0\n",
    )?;
    config.validate().map_err(|err| err.to_string())?;
    let router = config.router().map_err(|err| err.to_string())?;
    if (router.policy().guardrail_ratio - 3.0).abs() > f64::EPSILON {
        return Err("router did not pick up the configured ratio".to_string());
    }
    Ok(())
}

#[test]
fn unknown_policy_key_is_parse_error() -> TestResult {
    match config_from_toml("[policy]\nguardrail = 12.0\n") {
        Err(_) => Ok(()),
        Ok(_) => Err("expected unknown policy key to fail".to_string()),
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn audit_path_requires_enabled() -> TestResult {
    let config = parse("[audit]\npath = \"audit.jsonl\"\n")?;
    assert_invalid(config.validate(), "audit.enabled")
}

#[test]
fn audit_path_must_be_non_empty() -> TestResult {
    let config = parse("[audit]\nenabled = true\npath = \"  \"\n")?;
    assert_invalid(config.validate(), "audit.path must be non-empty")
}

// ============================================================================
// SECTION: Definitions
// ============================================================================

#[test]
fn review_date_outside_the_month_is_rejected() -> TestResult {
    let config = parse("[definitions]\nstatus = \"current\"\nreviewed_on = \"2026-02-31\"\n")?;
    assert_invalid(config.validate(), "definitions.reviewed_on")
}

#[test]
fn review_date_on_non_leap_february_29_is_rejected() -> TestResult {
    let config = parse("[definitions]\nreviewed_on = \"2025-02-29\"\n")?;
    assert_invalid(config.validate(), "definitions.reviewed_on")
}

#[test]
fn review_date_on_leap_day_is_accepted() -> TestResult {
    let config = parse("[definitions]\nreviewed_on = \"2024-02-29\"\n")?;
    config.validate().map_err(|err| err.to_string())
}
