// crates/directive-gate-core/tests/router.rs
// ============================================================================
// Module: Decision Router Tests
// Description: End-to-end routing scenarios over the built-in catalog.
// Purpose: Ensure halting, blocking, and escalation follow the gate policy.
// Dependencies: directive-gate-core, serde_json
// ============================================================================
//! ## Overview
//! Routes complete requests through the built-in catalog and checks the
//! decision, per-directive outcomes, surfaced advisories, and derived metrics.

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

use directive_gate_core::BlockReason;
use directive_gate_core::ContributionWarning;
use directive_gate_core::DecisionError;
use directive_gate_core::DecisionRouter;
use directive_gate_core::DecisionType;
use directive_gate_core::DefinitionsStatus;
use directive_gate_core::DirectiveId;
use directive_gate_core::DirectiveRegistry;
use directive_gate_core::GateNumber;
use directive_gate_core::GateState;
use directive_gate_core::PolicyConstants;
use directive_gate_core::RoutingDecision;
use directive_gate_core::RoutingRequest;
use directive_gate_core::builtin_catalog;
use directive_gate_core::core::catalog::DEFINE_CAC_MODEL;
use directive_gate_core::core::catalog::DEFINE_LTV_MODEL;
use directive_gate_core::core::catalog::DIAGNOSE_ACQUISITION_QUALITY;
use directive_gate_core::core::catalog::DIAGNOSE_CAPACITY;
use directive_gate_core::core::catalog::DIAGNOSE_CUSTOMER_QUALITY;
use directive_gate_core::core::catalog::DIAGNOSE_PRICING;
use directive_gate_core::core::catalog::DIAGNOSE_SCALABILITY;
use directive_gate_core::core::catalog::DIAGNOSE_UNIT_ECONOMICS;
use directive_gate_core::core::catalog::OPTIMIZE_SCALING_STRATEGY;
use serde_json::Value;
use serde_json::json;

/// Router over the built-in catalog with default policy.
fn router(definitions: DefinitionsStatus) -> DecisionRouter {
    DecisionRouter::new(
        DirectiveRegistry::new(builtin_catalog().unwrap()),
        PolicyConstants::default(),
        definitions,
    )
    .unwrap()
}

/// Adds order, repeat-profile, and horizon fields (contribution 625, usable LTV 1500).
fn with_ltv_fields(request: RoutingRequest) -> RoutingRequest {
    request
        .with_field("price", json!(1000))
        .with_field("cogs", json!(200))
        .with_field("variable_labor", json!(100))
        .with_field("packaging", json!(25))
        .with_field("shipping", json!(30))
        .with_field("fees", json!(20))
        .with_field("refund_allowance", json!(0))
        .with_field(
            "repeat_profile",
            json!([
                {"order_index": 1, "probability": 1.0, "month_offset": 0},
                {"order_index": 2, "probability": 1.0, "month_offset": 3},
                {"order_index": 3, "probability": 1.0, "month_offset": 6}
            ]),
        )
        .with_field("horizon_months", json!(12))
}

/// Adds CAC fields (blended 125, usable 150).
fn with_cac_fields(request: RoutingRequest) -> RoutingRequest {
    request
        .with_field("paid_acquisition_cost", json!(800))
        .with_field("allocated_acquisition_cost", json!(250))
        .with_field("acquisition_labor_cost", json!(200))
        .with_field("new_customers", json!(10))
}

/// Adds a capacity report with one resource.
fn with_capacity(request: RoutingRequest, utilization: f64, bottlenecked: bool) -> RoutingRequest {
    request.with_field(
        "capacity_report",
        json!({"laser": {"utilization": utilization, "bottlenecked": bottlenecked}}),
    )
}

/// Full acquisition request.
fn acquisition_request() -> RoutingRequest {
    let request = with_cac_fields(with_ltv_fields(RoutingRequest::for_decision(
        DecisionType::Acquisition,
    )));
    with_capacity(request, 0.6, false).with_field("customer_friction", json!("low"))
}

/// Outcome state for a directive.
fn state_of(result: &directive_gate_core::RoutingResult, directive: &str) -> Option<GateState> {
    result.outcome(directive).map(|outcome| outcome.state)
}

/// Reads a derived metric as f64.
fn metric(result: &directive_gate_core::RoutingResult, field: &str) -> f64 {
    result.metrics.get(field).and_then(Value::as_f64).unwrap()
}

// ============================================================================
// SECTION: Gate 0
// ============================================================================

/// Outdated definitions stop before anything runs.
#[test]
fn outdated_definitions_stop_at_gate_zero() {
    let result = router(DefinitionsStatus::Outdated).route(&acquisition_request()).unwrap();
    assert_eq!(
        result.decision,
        RoutingDecision::DefinitionsStop {
            gate: GateNumber::DEFINITIONS,
        }
    );
    assert!(result.directives_executed.is_empty());
    assert!(result.outcomes.is_empty());
    assert_eq!(
        result.halt_error,
        Some(DecisionError::DefinitionsNotAuthoritative {
            gate: GateNumber::DEFINITIONS,
        })
    );
    assert!(result.recommendation.contains("Gate 0"));
}

// ============================================================================
// SECTION: Stops and Escalation
// ============================================================================

/// Ratio 10 stops at the acquisition gate with the spend advisory.
#[test]
fn acquisition_end_to_end_stops_on_guardrail() {
    let result = router(DefinitionsStatus::Current).route(&acquisition_request()).unwrap();

    assert_eq!(
        result.decision,
        RoutingDecision::Stop {
            directive: DirectiveId::new(DIAGNOSE_ACQUISITION_QUALITY),
        }
    );
    assert_eq!(
        result.directives_executed,
        vec![
            DirectiveId::new(DEFINE_LTV_MODEL),
            DirectiveId::new(DEFINE_CAC_MODEL),
            DirectiveId::new(DIAGNOSE_UNIT_ECONOMICS),
            DirectiveId::new(DIAGNOSE_CAPACITY),
            DirectiveId::new(DIAGNOSE_CUSTOMER_QUALITY),
            DirectiveId::new(DIAGNOSE_ACQUISITION_QUALITY),
        ]
    );
    assert_eq!(result.passed_count(), 5);
    assert_eq!(state_of(&result, DIAGNOSE_ACQUISITION_QUALITY), Some(GateState::FailedStop));
    assert!(
        result
            .advisories
            .contains(&"Do not scale spend unless CAC ≤ LTV / 12 (12:1+ LTV:CAC).".to_string())
    );
    assert!((metric(&result, "order_contribution") - 625.0).abs() < 1e-9);
    assert!((metric(&result, "usable_ltv") - 1500.0).abs() < 1e-9);
    assert!((metric(&result, "usable_cac") - 150.0).abs() < 1e-9);
    assert!((metric(&result, "guardrail_ratio") - 10.0).abs() < 1e-9);
    assert!((metric(&result, "max_allowable_cac") - 125.0).abs() < 1e-9);
    assert!(!result.metrics.contains_key("price"));
}

/// A healthy shop escalates to the scaling strategy.
#[test]
fn scaling_growth_escalates_when_every_gate_passes() {
    let request =
        with_ltv_fields(RoutingRequest::for_decision(DecisionType::ScalingGrowth));
    let request = with_capacity(request, 0.5, false);
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();

    assert_eq!(
        result.decision,
        RoutingDecision::Escalate {
            directive: DirectiveId::new(OPTIMIZE_SCALING_STRATEGY),
        }
    );
    assert_eq!(result.passed_count(), 4);
    assert!(result.outcome(OPTIMIZE_SCALING_STRATEGY).is_none());
}

/// A negative contribution inside the refund allowance is flagged, then stops Gate 1.
#[test]
fn negative_contribution_within_allowance_is_flagged() {
    let request = with_ltv_fields(RoutingRequest::for_decision(DecisionType::FinancialViability))
        .with_field("price", json!(100))
        .with_field("cogs", json!(60))
        .with_field("variable_labor", json!(0))
        .with_field("packaging", json!(20))
        .with_field("shipping", json!(20))
        .with_field("fees", json!(5))
        .with_field("refund_allowance", json!(10));
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();

    assert_eq!(
        result.decision,
        RoutingDecision::Stop {
            directive: DirectiveId::new(DIAGNOSE_UNIT_ECONOMICS),
        }
    );
    assert!((metric(&result, "order_contribution") + 5.0).abs() < 1e-9);
    assert_eq!(
        result.warnings,
        vec![ContributionWarning::NegativeWithinAllowance, ContributionWarning::ZeroLabor]
    );
}

/// A healthy contribution raises no warnings.
#[test]
fn healthy_contribution_has_no_warnings() {
    let request = with_ltv_fields(RoutingRequest::for_decision(DecisionType::FinancialViability));
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();
    assert!(result.warnings.is_empty());
}

/// A bottlenecked resource stops scaling.
#[test]
fn bottleneck_stops_scalability() {
    let request =
        with_ltv_fields(RoutingRequest::for_decision(DecisionType::ScalingGrowth));
    let request = with_capacity(request, 0.5, true);
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();

    assert_eq!(
        result.decision,
        RoutingDecision::Stop {
            directive: DirectiveId::new(DIAGNOSE_SCALABILITY),
        }
    );
    assert_eq!(result.metrics.get("bottlenecked_resources"), Some(&json!(["laser"])));
}

// ============================================================================
// SECTION: Missing and Invalid Input
// ============================================================================

/// Pricing with no fields halts at the first definitions directive.
#[test]
fn pricing_without_fields_needs_input() {
    let request = RoutingRequest::for_decision(DecisionType::Pricing);
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();

    assert_eq!(
        result.decision,
        RoutingDecision::NeedsInput {
            directive: DirectiveId::new(DEFINE_LTV_MODEL),
        }
    );
    assert_eq!(
        state_of(&result, DEFINE_LTV_MODEL),
        Some(GateState::Blocked(BlockReason::MissingInput))
    );
    assert_eq!(result.passed_count(), 0);
    assert!(result.directives_executed.is_empty());
    assert!(result.missing_inputs.contains(&"price".to_string()));
    assert!(result.missing_inputs.contains(&"repeat_profile".to_string()));
    assert!(matches!(result.halt_error, Some(DecisionError::MissingInput { .. })));
    assert_eq!(result.outcomes.len(), 1);
}

/// Explicit null is treated as missing.
#[test]
fn null_field_counts_as_missing() {
    let request = with_ltv_fields(RoutingRequest::for_decision(DecisionType::FinancialViability))
        .with_field("shipping", Value::Null);
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();
    assert_eq!(result.missing_inputs, vec!["shipping".to_string()]);
}

/// A formula error blocks its dependents while independent directives continue.
#[test]
fn formula_error_blocks_dependents_only() {
    let request = with_ltv_fields(RoutingRequest::for_decision(DecisionType::Pricing))
        .with_field("paid_acquisition_cost", json!(800))
        .with_field("allocated_acquisition_cost", json!(250))
        .with_field("acquisition_labor_cost", json!(200))
        .with_field("new_customers", json!(0))
        .with_field("customer_friction", json!("moderate"))
        .with_field("pricing_fit", json!("aligned"));
    let request = with_capacity(request, 0.3, false);
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();

    let cac = result.outcome(DEFINE_CAC_MODEL).unwrap();
    assert_eq!(cac.state, GateState::Blocked(BlockReason::InvalidInput));
    assert_eq!(cac.error, Some(DecisionError::division_by_zero("new_customers")));
    assert_eq!(state_of(&result, DIAGNOSE_CUSTOMER_QUALITY), Some(GateState::Passed));
    assert_eq!(state_of(&result, DIAGNOSE_CAPACITY), Some(GateState::Passed));
    assert_eq!(
        state_of(&result, DIAGNOSE_PRICING),
        Some(GateState::Blocked(BlockReason::UnmetPrerequisite))
    );
    assert_eq!(result.unmet_prerequisites, vec![DirectiveId::new(DIAGNOSE_PRICING)]);
    assert!(!result.directives_executed.contains(&DirectiveId::new(DIAGNOSE_PRICING)));
    assert_eq!(
        result.decision,
        RoutingDecision::Unresolved {
            blocked: vec![DirectiveId::new(DEFINE_CAC_MODEL), DirectiveId::new(DIAGNOSE_PRICING)],
        }
    );
}

/// An unreadable collaborator label blocks the gate instead of failing it.
#[test]
fn unreadable_label_blocks_gate() {
    let request = RoutingRequest::for_decision(DecisionType::CustomerQuality)
        .with_field("customer_friction", json!(["low"]));
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();
    let outcome = result.outcome(DIAGNOSE_CUSTOMER_QUALITY).unwrap();
    assert_eq!(outcome.state, GateState::Blocked(BlockReason::InvalidInput));
    assert!(matches!(
        &outcome.error,
        Some(DecisionError::InvalidInput { field, .. }) if field == "customer_friction"
    ));
    assert_eq!(
        result.decision,
        RoutingDecision::Unresolved {
            blocked: vec![DirectiveId::new(DIAGNOSE_CUSTOMER_QUALITY)],
        }
    );
}

// ============================================================================
// SECTION: Clarification
// ============================================================================

/// Ambiguous intent asks one clarifying question and runs nothing.
#[test]
fn ambiguous_intent_needs_clarification() {
    let request = RoutingRequest {
        intent_keywords: vec!["zzqx".to_string()],
        ..RoutingRequest::default()
    };
    let result = router(DefinitionsStatus::Current).route(&request).unwrap();
    assert_eq!(result.decision, RoutingDecision::NeedsClarification);
    assert!(result.outcomes.is_empty());
    assert!(matches!(result.halt_error, Some(DecisionError::AmbiguousIntent { .. })));
}

/// Routing never mutates the request.
#[test]
fn routing_leaves_request_untouched() {
    let request = acquisition_request();
    let snapshot = request.clone();
    let _ = router(DefinitionsStatus::Current).route(&request).unwrap();
    assert_eq!(request, snapshot);
}
