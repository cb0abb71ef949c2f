//! Catalog override validation tests for directive-gate-config.
// crates/directive-gate-config/tests/catalog_validation.rs
// =============================================================================
// Module: Catalog Config Validation Tests
// Description: Catalog override parsing, validation, and routing.
// Purpose: Ensure configured catalogs obey the same rules as the built-in one.
// =============================================================================

use directive_gate_config::DirectiveGateConfig;
use directive_gate_core::DecisionType;
use directive_gate_core::DirectiveId;
use directive_gate_core::RoutingDecision;
use directive_gate_core::RoutingRequest;
use serde_json::json;

mod common;

use common::CUSTOM_CATALOG;
use common::TestResult;
use common::assert_invalid;
use common::config_from_toml;
use common::minimal_config;

/// Parses a TOML snippet into a config.
fn parse(toml_str: &str) -> Result<DirectiveGateConfig, String> {
    config_from_toml(toml_str).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Built-In Fallback
// ============================================================================

#[test]
fn no_overrides_builds_builtin_catalog() -> TestResult {
    let config = minimal_config().map_err(|err| err.to_string())?;
    let catalog = config.directive_catalog().map_err(|err| err.to_string())?;
    if catalog.directives().len() != 10 {
        return Err(format!("expected 10 directives, got {}", catalog.directives().len()));
    }
    Ok(())
}

#[test]
fn scenario_only_override_keeps_builtin_directives() -> TestResult {
    let config = parse(
        r#"
[[catalog.scenarios]]
id = "pricing"
decision_type = "pricing"
directives = ["diagnose_pricing"]
"#,
    )?;
    config.validate().map_err(|err| err.to_string())?;
    let catalog = config.directive_catalog().map_err(|err| err.to_string())?;
    if catalog.scenarios().len() != 1 {
        return Err("expected the scenario table to be replaced".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Custom Catalog Routing
// ============================================================================

#[test]
fn custom_catalog_routes_to_its_escalation() -> TestResult {
    let config = parse(CUSTOM_CATALOG)?;
    config.validate().map_err(|err| err.to_string())?;
    let router = config.router().map_err(|err| err.to_string())?;
    let request = RoutingRequest::for_decision(DecisionType::Pricing)
        .with_field("order_contribution", json!(12.5));
    let result = router.route(&request).map_err(|err| err.to_string())?;
    let expected = RoutingDecision::Escalate {
        directive: DirectiveId::new("scale_up"),
    };
    if result.decision != expected {
        return Err(format!("unexpected decision {}", result.decision.label()));
    }
    if result.advisories != vec!["Stop if margin is negative.".to_string()] {
        return Err("expected scenario stop condition as advisory".to_string());
    }
    Ok(())
}

#[test]
fn custom_catalog_stops_on_failed_gate() -> TestResult {
    let config = parse(CUSTOM_CATALOG)?;
    let router = config.router().map_err(|err| err.to_string())?;
    let request = RoutingRequest::for_decision(DecisionType::Pricing)
        .with_field("order_contribution", json!(-3));
    let result = router.route(&request).map_err(|err| err.to_string())?;
    let expected = RoutingDecision::Stop {
        directive: DirectiveId::new("check_margin"),
    };
    if result.decision != expected {
        return Err(format!("unexpected decision {}", result.decision.label()));
    }
    if result.recommendation != "Fix the margin first." {
        return Err(format!("unexpected recommendation {}", result.recommendation));
    }
    if !result.advisories.contains(&"Do not scale a losing order.".to_string()) {
        return Err("expected do-not advisory".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Rejections
// ============================================================================

#[test]
fn unknown_prerequisite_is_rejected() -> TestResult {
    let config = parse(&CUSTOM_CATALOG.replace(
        "prerequisites = [\"check_margin\"]",
        "prerequisites = [\"check_churn\"]",
    ))?;
    assert_invalid(config.validate(), "unknown prerequisite check_churn")
}

#[test]
fn missing_escalation_is_rejected() -> TestResult {
    let config = parse(
        r#"
[catalog]
scenarios = []

[[catalog.directives]]
id = "check_margin"
title = "Check margin"
required_inputs = ["order_contribution"]
conditions = [{ field = "order_contribution", comparator = "greater_than", expected = { literal = 0 } }]
"#,
    )?;
    assert_invalid(config.validate(), "exactly one escalation")
}

#[test]
fn builtin_scenarios_against_custom_directives_are_rejected() -> TestResult {
    let without_scenarios = CUSTOM_CATALOG
        .split("[[catalog.scenarios]]")
        .next()
        .ok_or_else(|| "catalog fixture is empty".to_string())?;
    let config = parse(without_scenarios)?;
    assert_invalid(config.validate(), "unknown directive")
}

#[test]
fn condition_without_expected_value_is_rejected() -> TestResult {
    let config = parse(&CUSTOM_CATALOG.replace(", expected = { literal = 0 }", ""))?;
    assert_invalid(config.validate(), "expected value mismatch")
}
