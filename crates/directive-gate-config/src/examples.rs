// crates/directive-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `directive-gate.toml`. The output is deterministic and
//! must always load and validate.

/// Returns a canonical example `directive-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[definitions]
status = "current"
reviewed_on = "2026-01-15"

[policy]
guardrail_ratio = 12.0
ltv_discount_factor = 0.80
cac_risk_buffer = 1.20
max_capacity_utilization = 0.85

[audit]
enabled = true
path = "directive-gate-audit.jsonl"
include_payloads = false

# Optional catalog overrides replace the built-in tables wholesale.
# [[catalog.directives]]
# id = "check_margin"
# title = "Check margin"
# gate = 1
# required_inputs = ["order_contribution"]
# conditions = [{ field = "order_contribution", comparator = "greater_than", expected = { literal = 0 } }]
"#,
    )
}
