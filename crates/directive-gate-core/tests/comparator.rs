// crates/directive-gate-core/tests/comparator.rs
// ============================================================================
// Module: Comparator Evaluation Tests
// Description: Comparator evaluation tests for gate conditions.
// Purpose: Ensure comparators produce correct tri-state results.
// Dependencies: directive-gate-core
// ============================================================================
//! ## Overview
//! Validates comparator behavior for present, absent, and null field values.
//!
//! Security posture: comparators must fail closed; unreadable data is `Unknown`.

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

use directive_gate_core::Comparator;
use directive_gate_core::TriState;
use directive_gate_core::runtime::comparator::evaluate_comparator;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Exists / NotExists
// ============================================================================

/// Verifies Exists and `NotExists` treat null as absent.
#[test]
fn comparator_exists_treats_null_as_absent() {
    let present = json!(1);
    let null = Value::Null;

    assert_eq!(evaluate_comparator(Comparator::Exists, None, Some(&present)), TriState::True);
    assert_eq!(evaluate_comparator(Comparator::Exists, None, Some(&null)), TriState::False);
    assert_eq!(evaluate_comparator(Comparator::Exists, None, None), TriState::False);
    assert_eq!(evaluate_comparator(Comparator::NotExists, None, Some(&null)), TriState::True);
    assert_eq!(evaluate_comparator(Comparator::NotExists, None, Some(&present)), TriState::False);
}

// ============================================================================
// SECTION: Numeric Comparators
// ============================================================================

/// Verifies decimal-aware ordering at the guardrail boundary.
#[test]
fn comparator_ordering_is_decimal_aware() {
    let threshold = json!(12.0);
    assert_eq!(
        evaluate_comparator(Comparator::GreaterThanOrEqual, Some(&threshold), Some(&json!(12))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::GreaterThanOrEqual, Some(&threshold), Some(&json!(11.99))),
        TriState::False
    );
    assert_eq!(
        evaluate_comparator(Comparator::GreaterThan, Some(&json!(0)), Some(&json!(625.0))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::LessThan, Some(&json!(0.85)), Some(&json!(0.85))),
        TriState::False
    );
}

/// Verifies numeric equality ignores representation.
#[test]
fn comparator_equality_ignores_numeric_representation() {
    assert_eq!(
        evaluate_comparator(Comparator::Equals, Some(&json!(12)), Some(&json!(12.0))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::NotEquals, Some(&json!(12)), Some(&json!(12.5))),
        TriState::True
    );
}

/// Verifies type mismatches and missing values yield Unknown.
#[test]
fn comparator_mismatch_and_missing_are_unknown() {
    assert_eq!(
        evaluate_comparator(Comparator::GreaterThan, Some(&json!(0)), Some(&json!("625"))),
        TriState::Unknown
    );
    assert_eq!(evaluate_comparator(Comparator::GreaterThan, Some(&json!(0)), None), TriState::Unknown);
    assert_eq!(
        evaluate_comparator(Comparator::LessThan, Some(&json!(0.85)), Some(&Value::Null)),
        TriState::Unknown
    );
    assert_eq!(evaluate_comparator(Comparator::Equals, None, Some(&json!(1))), TriState::Unknown);
}

// ============================================================================
// SECTION: Collection Comparators
// ============================================================================

/// Verifies set membership for collaborator labels.
#[test]
fn comparator_in_set_matches_labels() {
    let allowed = json!(["low", "moderate"]);
    assert_eq!(
        evaluate_comparator(Comparator::InSet, Some(&allowed), Some(&json!("low"))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::InSet, Some(&allowed), Some(&json!("high"))),
        TriState::False
    );
    assert_eq!(
        evaluate_comparator(Comparator::InSet, Some(&allowed), Some(&json!(["low"]))),
        TriState::Unknown
    );
}

/// Verifies deep equality on bottleneck lists.
#[test]
fn comparator_deep_equals_compares_arrays() {
    let empty = json!([]);
    assert_eq!(
        evaluate_comparator(Comparator::DeepEquals, Some(&empty), Some(&json!([]))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::DeepEquals, Some(&empty), Some(&json!(["laser"]))),
        TriState::False
    );
    assert_eq!(
        evaluate_comparator(Comparator::DeepNotEquals, Some(&empty), Some(&json!(["laser"]))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::DeepEquals, Some(&empty), Some(&json!("laser"))),
        TriState::Unknown
    );
}

/// Verifies string and array containment.
#[test]
fn comparator_contains_handles_strings_and_arrays() {
    assert_eq!(
        evaluate_comparator(Comparator::Contains, Some(&json!("cut")), Some(&json!("laser cutting"))),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(
            Comparator::Contains,
            Some(&json!(["laser"])),
            Some(&json!(["laser", "finishing"]))
        ),
        TriState::True
    );
    assert_eq!(
        evaluate_comparator(Comparator::Contains, Some(&json!(1)), Some(&json!([1]))),
        TriState::Unknown
    );
}

/// Verifies every comparator/value pair evaluates without panicking.
#[test]
fn comparator_grid_does_not_panic() {
    let values = vec![
        Value::Null,
        json!(true),
        json!(0),
        json!(-1),
        json!(1.5),
        json!(""),
        json!("text"),
        json!([]),
        json!([1, 2]),
        json!({}),
        json!({"nested": "value"}),
    ];
    let comparators = [
        Comparator::Equals,
        Comparator::NotEquals,
        Comparator::GreaterThan,
        Comparator::GreaterThanOrEqual,
        Comparator::LessThan,
        Comparator::LessThanOrEqual,
        Comparator::Contains,
        Comparator::InSet,
        Comparator::DeepEquals,
        Comparator::DeepNotEquals,
        Comparator::Exists,
        Comparator::NotExists,
    ];
    for expected in &values {
        for actual in &values {
            for comparator in comparators {
                let outcome = evaluate_comparator(comparator, Some(expected), Some(actual));
                if actual.is_null() && comparator.takes_expected() {
                    assert_eq!(outcome, TriState::Unknown);
                }
            }
        }
    }
}
