// crates/directive-gate-core/src/runtime/comparator.rs
// ============================================================================
// Module: Directive Gate Comparator Logic
// Description: Comparator evaluation for gate conditions.
// Purpose: Convert field values into tri-state condition outcomes.
// Dependencies: crate::core, bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! Comparator evaluation converts a field value into a tri-state outcome.
//! Missing values, type mismatches, and unparsable numbers yield `Unknown`
//! so a gate never passes on data it cannot read. Numeric ordering is
//! decimal-aware: `11.99` is strictly below `12` and `12.0` equals `12`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;

use crate::core::Comparator;
use crate::core::TriState;

// ============================================================================
// SECTION: Comparator Evaluation
// ============================================================================

/// Evaluates a comparator against an optional field value.
///
/// A JSON `null` is treated the same as an absent value.
#[must_use]
pub fn evaluate_comparator(
    comparator: Comparator,
    expected: Option<&Value>,
    actual: Option<&Value>,
) -> TriState {
    let actual = actual.filter(|value| !value.is_null());
    match comparator {
        Comparator::Exists => TriState::from(actual.is_some()),
        Comparator::NotExists => TriState::from(actual.is_none()),
        _ => {
            let (Some(actual), Some(expected)) = (actual, expected) else {
                return TriState::Unknown;
            };
            evaluate_json_comparator(comparator, expected, actual)
        }
    }
}

/// Evaluates value comparators against a present JSON value.
fn evaluate_json_comparator(comparator: Comparator, expected: &Value, actual: &Value) -> TriState {
    match comparator {
        Comparator::Equals => compare_equals(actual, expected),
        Comparator::NotEquals => compare_not_equals(actual, expected),
        Comparator::GreaterThan
        | Comparator::GreaterThanOrEqual
        | Comparator::LessThan
        | Comparator::LessThanOrEqual => compare_ordering(comparator, actual, expected),
        Comparator::Contains => compare_contains(actual, expected),
        Comparator::InSet => compare_in_set(actual, expected),
        Comparator::DeepEquals => compare_deep_equals(actual, expected),
        Comparator::DeepNotEquals => compare_deep_not_equals(actual, expected),
        Comparator::Exists | Comparator::NotExists => TriState::Unknown,
    }
}

/// Compares JSON values for equality, with decimal-aware numeric handling.
fn compare_equals(left: &Value, right: &Value) -> TriState {
    match (left, right) {
        (Value::Number(left_num), Value::Number(right_num)) => {
            compare_decimal_equality(left_num, right_num, true)
        }
        _ => TriState::from(left == right),
    }
}

/// Compares JSON values for inequality, with decimal-aware numeric handling.
fn compare_not_equals(left: &Value, right: &Value) -> TriState {
    match (left, right) {
        (Value::Number(left_num), Value::Number(right_num)) => {
            compare_decimal_equality(left_num, right_num, false)
        }
        _ => TriState::from(left != right),
    }
}

/// Compares numeric JSON values using ordering comparators.
fn compare_ordering(comparator: Comparator, left: &Value, right: &Value) -> TriState {
    let (Some(left_num), Some(right_num)) = (left.as_number(), right.as_number()) else {
        return TriState::Unknown;
    };
    let Some(ordering) = decimal_cmp(left_num, right_num) else {
        return TriState::Unknown;
    };
    let result = match comparator {
        Comparator::GreaterThan => ordering.is_gt(),
        Comparator::GreaterThanOrEqual => ordering.is_ge(),
        Comparator::LessThan => ordering.is_lt(),
        Comparator::LessThanOrEqual => ordering.is_le(),
        _ => return TriState::Unknown,
    };
    TriState::from(result)
}

/// Compares arrays/objects using deep structural equality.
fn compare_deep_equals(left: &Value, right: &Value) -> TriState {
    match (left, right) {
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            TriState::from(left == right)
        }
        _ => TriState::Unknown,
    }
}

/// Compares arrays/objects using deep structural inequality.
fn compare_deep_not_equals(left: &Value, right: &Value) -> TriState {
    match (left, right) {
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            TriState::from(left != right)
        }
        _ => TriState::Unknown,
    }
}

/// Evaluates containment semantics for JSON values.
fn compare_contains(left: &Value, right: &Value) -> TriState {
    match (left, right) {
        (Value::String(haystack), Value::String(needle)) => {
            TriState::from(haystack.contains(needle.as_str()))
        }
        (Value::Array(haystack), Value::Array(needle)) => {
            TriState::from(needle.iter().all(|item| haystack.contains(item)))
        }
        _ => TriState::Unknown,
    }
}

/// Evaluates set membership for scalar JSON values.
fn compare_in_set(value: &Value, expected: &Value) -> TriState {
    let Value::Array(values) = expected else {
        return TriState::Unknown;
    };
    match value {
        Value::Array(_) | Value::Object(_) => TriState::Unknown,
        _ => TriState::from(values.contains(value)),
    }
}

/// Compares numbers by parsing them into `BigDecimal` values.
fn compare_decimal_equality(left: &Number, right: &Number, equals: bool) -> TriState {
    let Some(left) = decimal_from_number(left) else {
        return TriState::Unknown;
    };
    let Some(right) = decimal_from_number(right) else {
        return TriState::Unknown;
    };
    TriState::from(if equals { left == right } else { left != right })
}

/// Orders numeric JSON values using decimal-aware comparison.
fn decimal_cmp(left: &Number, right: &Number) -> Option<Ordering> {
    let left = decimal_from_number(left)?;
    let right = decimal_from_number(right)?;
    Some(left.cmp(&right))
}

/// Parses a JSON number into `BigDecimal` with a stable string representation.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}
