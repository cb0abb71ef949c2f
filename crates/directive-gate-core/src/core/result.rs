// crates/directive-gate-core/src/core/result.rs
// ============================================================================
// Module: Directive Gate Routing Result
// Description: Gate states, per-directive outcomes, and the final decision.
// Purpose: Provide the structured, serializable output of a routing call.
// Dependencies: crate::core::{error, identifiers, intent, metrics, tristate}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`RoutingResult`] records what ran, in order, how each directive ended,
//! and what the operator should do next. It is the only artifact a routing
//! call produces; nothing is persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::directive::Comparator;
use crate::core::error::DecisionError;
use crate::core::identifiers::DirectiveId;
use crate::core::identifiers::GateNumber;
use crate::core::identifiers::ScenarioId;
use crate::core::intent::DecisionType;
use crate::core::intent::PainSignal;
use crate::core::intent::TimeHorizon;
use crate::core::metrics::ContributionWarning;
use crate::core::tristate::TriState;

// ============================================================================
// SECTION: Gate State
// ============================================================================

/// Why a directive could not reach a pass/fail verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Required inputs are absent or null.
    MissingInput,
    /// A prerequisite did not pass.
    UnmetPrerequisite,
    /// A formula or comparator could not decide from the supplied data.
    InvalidInput,
}

/// Per-directive gate state.
///
/// # Invariants
/// - `Passed`, `FailedStop`, and `Blocked` are terminal for a routing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Not yet considered.
    NotStarted,
    /// Inputs complete and prerequisites passed; evaluating.
    Running,
    /// Predicate held.
    Passed,
    /// Predicate failed; halts the routing call.
    FailedStop,
    /// Cannot proceed until the caller corrects the input.
    Blocked(BlockReason),
}

impl GateState {
    /// Stable label for logs and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::FailedStop => "failed_stop",
            Self::Blocked(BlockReason::MissingInput) => "blocked_missing_input",
            Self::Blocked(BlockReason::UnmetPrerequisite) => "blocked_unmet_prerequisite",
            Self::Blocked(BlockReason::InvalidInput) => "blocked_invalid_input",
        }
    }

    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::FailedStop | Self::Blocked(_))
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Directive Outcome
// ============================================================================

/// Trace entry for one evaluated condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTrace {
    /// Field that was read.
    pub field: String,
    /// Comparator applied.
    pub comparator: Comparator,
    /// Value observed, when present.
    pub actual: Option<Value>,
    /// Expected value after policy resolution.
    pub expected: Option<Value>,
    /// Condition outcome.
    pub status: TriState,
}

/// Outcome of one directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveOutcome {
    /// Directive identifier.
    pub directive: DirectiveId,
    /// Gate number, when numbered.
    pub gate: Option<GateNumber>,
    /// Terminal state reached.
    pub state: GateState,
    /// Missing fields when blocked on input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_inputs: Vec<String>,
    /// Prerequisites that did not pass.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_prerequisites: Vec<DirectiveId>,
    /// Error raised by the directive's formula or input check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DecisionError>,
    /// Per-condition trace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<ConditionTrace>,
}

// ============================================================================
// SECTION: Routing Decision
// ============================================================================

/// Final decision of a routing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Every gate passed; escalate to the named directive.
    Escalate {
        /// Escalation directive.
        directive: DirectiveId,
    },
    /// A gate failed and halted the route.
    Stop {
        /// Stopping directive.
        directive: DirectiveId,
    },
    /// Gate 0 is closed; nothing ran.
    DefinitionsStop {
        /// Closed gate.
        gate: GateNumber,
    },
    /// A directive needs more input; the route halted there.
    NeedsInput {
        /// Directive waiting on input.
        directive: DirectiveId,
    },
    /// Intent is ambiguous; one clarifying question must be answered.
    NeedsClarification,
    /// No gate failed, but some directives were blocked on invalid input.
    Unresolved {
        /// Directives blocked by invalid input or unmet prerequisites.
        blocked: Vec<DirectiveId>,
    },
}

impl RoutingDecision {
    /// Stable label for logs and audit events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Escalate { .. } => "escalate",
            Self::Stop { .. } => "stop",
            Self::DefinitionsStop { .. } => "definitions_stop",
            Self::NeedsInput { .. } => "needs_input",
            Self::NeedsClarification => "needs_clarification",
            Self::Unresolved { .. } => "unresolved",
        }
    }
}

// ============================================================================
// SECTION: Routing Result
// ============================================================================

/// Structured routing output.
///
/// # Invariants
/// - `directives_executed` only lists directives whose prerequisites all passed.
/// - `outcomes` follow resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    /// Decision type from the request.
    pub decision_type: Option<DecisionType>,
    /// Pain signal from the request.
    pub pain_signal: Option<PainSignal>,
    /// Time horizon from the request.
    pub time_horizon: TimeHorizon,
    /// Scenario groups that contributed to the route.
    pub scenarios: Vec<ScenarioId>,
    /// Resolved directive order.
    pub directives_resolved: Vec<DirectiveId>,
    /// Directives that reached gate evaluation, in order.
    pub directives_executed: Vec<DirectiveId>,
    /// Per-directive outcomes, in order.
    pub outcomes: Vec<DirectiveOutcome>,
    /// Final decision.
    pub decision: RoutingDecision,
    /// Recommendation text.
    pub recommendation: String,
    /// Why this sequence comes next.
    pub rationale: Vec<String>,
    /// Operator-facing descriptions of inputs to gather.
    pub required_inputs: Vec<String>,
    /// Directives that did not run because a prerequisite failed.
    pub unmet_prerequisites: Vec<DirectiveId>,
    /// Missing fields requested from the caller.
    pub missing_inputs: Vec<String>,
    /// Do-not advisories and explicit stop conditions.
    pub advisories: Vec<String>,
    /// Flags raised on an accepted contribution, in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ContributionWarning>,
    /// Derived metric values keyed by field.
    pub metrics: BTreeMap<String, Value>,
    /// Error that halted the call, when any.
    pub halt_error: Option<DecisionError>,
}

impl RoutingResult {
    /// Returns the outcome for a directive.
    #[must_use]
    pub fn outcome(&self, directive: &str) -> Option<&DirectiveOutcome> {
        self.outcomes.iter().find(|outcome| outcome.directive.as_str() == directive)
    }

    /// Counts directives that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.state == GateState::Passed).count()
    }
}
