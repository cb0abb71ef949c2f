// crates/directive-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for directive-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use directive_gate_config::ConfigError;
use directive_gate_config::DirectiveGateConfig;

/// Result type shared by config tests.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `DirectiveGateConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<DirectiveGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<DirectiveGateConfig, toml::de::Error> {
    config_from_toml("")
}

/// Assert that a validation result is an error containing a specific substring.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

/// Custom two-directive catalog in TOML form.
pub const CUSTOM_CATALOG: &str = r#"
[[catalog.directives]]
id = "check_margin"
title = "Check margin"
gate = 1
required_inputs = ["order_contribution"]
triggers = ["margin"]
conditions = [{ field = "order_contribution", comparator = "greater_than", expected = { literal = 0 } }]
stop_recommendation = "Fix the margin first."
do_not = ["Do not scale a losing order."]

[[catalog.directives]]
id = "scale_up"
title = "Scale up"
kind = "escalation"
prerequisites = ["check_margin"]

[[catalog.scenarios]]
id = "pricing"
decision_type = "pricing"
directives = ["check_margin", "scale_up"]
triggers = ["price"]
why = "Margin decides everything."
stop_conditions = ["Stop if margin is negative."]
"#;
