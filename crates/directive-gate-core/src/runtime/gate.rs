// crates/directive-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Directive Gate Gate Evaluation
// Description: Per-gate state machine and condition evaluation with traces.
// Purpose: Evaluate directive predicates against field snapshots deterministically.
// Dependencies: crate::core, crate::runtime::comparator, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`GateRun`] enforces the legal lifecycle of one directive:
//!
//! ```text
//! NotStarted -> Blocked(MissingInput | UnmetPrerequisite)
//! NotStarted -> Running
//! Running    -> Passed | FailedStop | Blocked(InvalidInput)
//! ```
//!
//! [`GateEvaluator`] conjoins a directive's conditions with strong Kleene
//! logic over a snapshot of provided and derived fields, resolving policy
//! references against the evaluator's constants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::BlockReason;
use crate::core::ConditionSpec;
use crate::core::ConditionTrace;
use crate::core::DirectiveId;
use crate::core::DirectiveSpec;
use crate::core::ExpectedValue;
use crate::core::GateState;
use crate::core::PolicyConstants;
use crate::core::TriState;
use crate::runtime::comparator::evaluate_comparator;

// ============================================================================
// SECTION: Gate Run
// ============================================================================

/// Rejected gate state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal gate transition for {directive}: {from} -> {to}")]
pub struct GateTransitionError {
    /// Directive whose gate was being advanced.
    pub directive: DirectiveId,
    /// State before the transition.
    pub from: GateState,
    /// Requested state.
    pub to: GateState,
}

/// Lifecycle of one directive's gate within a routing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRun {
    /// Directive being evaluated.
    directive: DirectiveId,
    /// Current state.
    state: GateState,
}

impl GateRun {
    /// Starts a run in [`GateState::NotStarted`].
    #[must_use]
    pub const fn new(directive: DirectiveId) -> Self {
        Self {
            directive,
            state: GateState::NotStarted,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Advances the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`GateTransitionError`] for any transition outside the lifecycle.
    pub fn transition(&mut self, next: GateState) -> Result<(), GateTransitionError> {
        if !is_legal(self.state, next) {
            return Err(GateTransitionError {
                directive: self.directive.clone(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

/// Returns true for transitions allowed by the gate lifecycle.
const fn is_legal(from: GateState, to: GateState) -> bool {
    matches!(
        (from, to),
        (
            GateState::NotStarted,
            GateState::Running
                | GateState::Blocked(BlockReason::MissingInput | BlockReason::UnmetPrerequisite)
        ) | (
            GateState::Running,
            GateState::Passed | GateState::FailedStop | GateState::Blocked(BlockReason::InvalidInput)
        )
    )
}

// ============================================================================
// SECTION: Gate Evaluator
// ============================================================================

/// Result of evaluating one directive's conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct GateEvaluation {
    /// Conjoined outcome.
    pub status: TriState,
    /// Per-condition trace in declaration order.
    pub trace: Vec<ConditionTrace>,
}

/// Evaluates gate conditions against field snapshots using tri-state logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateEvaluator {
    /// Policy constants for `policy` expected values.
    policy: PolicyConstants,
}

impl GateEvaluator {
    /// Creates an evaluator bound to policy constants.
    #[must_use]
    pub const fn new(policy: PolicyConstants) -> Self {
        Self {
            policy,
        }
    }

    /// Evaluates every condition of a directive against a field snapshot.
    #[must_use]
    pub fn evaluate(
        &self,
        directive: &DirectiveSpec,
        fields: &BTreeMap<String, Value>,
    ) -> GateEvaluation {
        let trace: Vec<ConditionTrace> = directive
            .conditions
            .iter()
            .map(|condition| self.evaluate_condition(condition, fields))
            .collect();
        let status = TriState::all(trace.iter().map(|entry| entry.status));
        GateEvaluation {
            status,
            trace,
        }
    }

    /// Evaluates one condition.
    fn evaluate_condition(
        &self,
        condition: &ConditionSpec,
        fields: &BTreeMap<String, Value>,
    ) -> ConditionTrace {
        let actual = fields.get(&condition.field);
        let expected = condition.expected.as_ref().and_then(|expected| self.resolve(expected));
        let status = evaluate_comparator(condition.comparator, expected.as_ref(), actual);
        ConditionTrace {
            field: condition.field.clone(),
            comparator: condition.comparator,
            actual: actual.cloned(),
            expected,
            status,
        }
    }

    /// Resolves an expected value; unrepresentable policy numbers resolve to nothing.
    fn resolve(&self, expected: &ExpectedValue) -> Option<Value> {
        match expected {
            ExpectedValue::Literal(value) => Some(value.clone()),
            ExpectedValue::Policy(key) => {
                Number::from_f64(self.policy.value(*key)).map(Value::Number)
            }
        }
    }
}
