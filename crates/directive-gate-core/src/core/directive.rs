// crates/directive-gate-core/src/core/directive.rs
// ============================================================================
// Module: Directive Gate Directive Catalog
// Description: Declarative directives, gate conditions, and scenario groups.
// Purpose: Model policy-as-data and validate it once at startup.
// Dependencies: crate::core::{identifiers, intent, policy}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A directive is a named unit of business policy: prerequisites, required
//! input fields, trigger keywords, an optional metric step, declarative gate
//! conditions, and do-not advisories. Scenario groups bind a decision type or
//! pain signal to a declared directive sequence.
//!
//! [`DirectiveCatalog::new`] validates the whole table and fails closed; a
//! constructed catalog is immutable and shared by every routing call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::DirectiveId;
use crate::core::identifiers::GateNumber;
use crate::core::identifiers::ScenarioId;
use crate::core::intent::DecisionType;
use crate::core::intent::PainSignal;
use crate::core::policy::PolicyKey;

// ============================================================================
// SECTION: Derived Field Names
// ============================================================================

/// Per-order contribution written by contribution and LTV steps.
pub const FIELD_ORDER_CONTRIBUTION: &str = "order_contribution";
/// Contribution margin (absent when price is zero).
pub const FIELD_CONTRIBUTION_MARGIN: &str = "contribution_margin";
/// Raw LTV.
pub const FIELD_RAW_LTV: &str = "raw_ltv";
/// Usable LTV.
pub const FIELD_USABLE_LTV: &str = "usable_ltv";
/// Blended CAC.
pub const FIELD_BLENDED_CAC: &str = "blended_cac";
/// Usable CAC.
pub const FIELD_USABLE_CAC: &str = "usable_cac";
/// Per-channel CAC map.
pub const FIELD_CHANNEL_CAC: &str = "channel_cac";
/// Guardrail ratio.
pub const FIELD_GUARDRAIL_RATIO: &str = "guardrail_ratio";
/// CAC ceiling for the guardrail threshold.
pub const FIELD_MAX_ALLOWABLE_CAC: &str = "max_allowable_cac";
/// Highest utilization in the capacity report.
pub const FIELD_PEAK_UTILIZATION: &str = "peak_utilization";
/// Sorted names of bottlenecked resources.
pub const FIELD_BOTTLENECKED_RESOURCES: &str = "bottlenecked_resources";

// ============================================================================
// SECTION: Comparators
// ============================================================================

/// Comparator applied by a gate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Decimal-aware equality.
    Equals,
    /// Decimal-aware inequality.
    NotEquals,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `>=`.
    GreaterThanOrEqual,
    /// Numeric `<`.
    LessThan,
    /// Numeric `<=`.
    LessThanOrEqual,
    /// Substring or array containment.
    Contains,
    /// Scalar membership in an expected array.
    InSet,
    /// Structural equality for arrays and objects.
    DeepEquals,
    /// Structural inequality for arrays and objects.
    DeepNotEquals,
    /// Field is present and not null.
    Exists,
    /// Field is absent or null.
    NotExists,
}

impl Comparator {
    /// Returns true when the comparator takes an expected value.
    #[must_use]
    pub const fn takes_expected(self) -> bool {
        !matches!(self, Self::Exists | Self::NotExists)
    }
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedValue {
    /// Literal JSON value.
    Literal(Value),
    /// Named policy constant resolved at evaluation time.
    Policy(PolicyKey),
}

/// One declarative gate condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    /// Field read from provided inputs or derived metrics.
    pub field: String,
    /// Comparator to apply.
    pub comparator: Comparator,
    /// Expected value, required unless the comparator is `exists`/`not_exists`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<ExpectedValue>,
}

// ============================================================================
// SECTION: Metric Steps
// ============================================================================

/// Formula a directive runs before its gate conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStep {
    /// Per-order contribution and margin.
    OrderContribution,
    /// Contribution plus expected LTV over the horizon.
    Ltv,
    /// Blended, per-channel, and usable CAC.
    Cac,
    /// Usable LTV ÷ usable CAC from earlier steps.
    Guardrail,
    /// Peak utilization and bottlenecks from the capacity report.
    Capacity,
}

impl MetricStep {
    /// Request fields the step reads; each must be a declared required input.
    #[must_use]
    pub fn request_fields(self) -> &'static [&'static str] {
        match self {
            Self::OrderContribution => &crate::core::metrics::MetricInputs::FIELDS,
            Self::Ltv => &[
                "price",
                "cogs",
                "variable_labor",
                "packaging",
                "shipping",
                "fees",
                "refund_allowance",
                "repeat_profile",
                "horizon_months",
            ],
            Self::Cac => &[
                "paid_acquisition_cost",
                "allocated_acquisition_cost",
                "acquisition_labor_cost",
                "new_customers",
            ],
            Self::Guardrail => &[],
            Self::Capacity => &["capacity_report"],
        }
    }
}

// ============================================================================
// SECTION: Directive Spec
// ============================================================================

/// Directive flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// Diagnostic gate evaluated in sequence.
    #[default]
    Gate,
    /// Escalation target reached only when every gate passes.
    Escalation,
}

/// A named unit of business policy.
///
/// # Invariants
/// - Immutable once placed in a validated [`DirectiveCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveSpec {
    /// Directive identifier.
    pub id: DirectiveId,
    /// Short title.
    pub title: String,
    /// Diagnostic gate number, when the directive is a numbered gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateNumber>,
    /// Gate or escalation.
    #[serde(default)]
    pub kind: DirectiveKind,
    /// Directives that must pass first, in declared order.
    #[serde(default)]
    pub prerequisites: Vec<DirectiveId>,
    /// Request fields that must be present and non-null.
    #[serde(default)]
    pub required_inputs: Vec<String>,
    /// Request fields read when present.
    #[serde(default)]
    pub optional_inputs: Vec<String>,
    /// Keywords that pull this directive into a route.
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Formula run before the gate conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricStep>,
    /// Conditions that must all hold for the gate to pass.
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    /// Recommendation surfaced when this directive stops the route.
    #[serde(default)]
    pub stop_recommendation: String,
    /// Do-not advisories surfaced verbatim on stop.
    #[serde(default)]
    pub do_not: Vec<String>,
}

// ============================================================================
// SECTION: Scenario Spec
// ============================================================================

/// Scenario group bound to a decision type or a pain signal.
///
/// # Invariants
/// - Exactly one of `decision_type` or `pain_signal` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioSpec {
    /// Scenario identifier.
    pub id: ScenarioId,
    /// Decision type this group routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_type: Option<DecisionType>,
    /// Pain signal this group routes; overrides the decision type group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_signal: Option<PainSignal>,
    /// Declared directive sequence.
    pub directives: Vec<DirectiveId>,
    /// Trigger keywords (case-insensitive).
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Why this sequence comes next.
    #[serde(default)]
    pub why: String,
    /// Human descriptions of the inputs the operator should gather.
    #[serde(default)]
    pub required_inputs: Vec<String>,
    /// Explicit stop conditions / do-not advisories.
    #[serde(default)]
    pub stop_conditions: Vec<String>,
}

// ============================================================================
// SECTION: Catalog Errors
// ============================================================================

/// Catalog validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog declares no directives.
    #[error("catalog declares no directives")]
    Empty,
    /// Directive identifier declared twice.
    #[error("duplicate directive id: {0}")]
    DuplicateDirective(DirectiveId),
    /// Prerequisite does not name a declared directive.
    #[error("directive {directive} has unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        /// Declaring directive.
        directive: DirectiveId,
        /// Unknown prerequisite.
        prerequisite: DirectiveId,
    },
    /// Prerequisite graph contains a cycle through this directive.
    #[error("prerequisite cycle through directive {0}")]
    PrerequisiteCycle(DirectiveId),
    /// Directive definition is malformed.
    #[error("directive {directive} is invalid: {reason}")]
    InvalidDirective {
        /// Offending directive.
        directive: DirectiveId,
        /// Reason.
        reason: String,
    },
    /// Exactly one escalation directive is required.
    #[error("catalog must declare exactly one escalation directive (found {0})")]
    EscalationCount(usize),
    /// Scenario identifier declared twice.
    #[error("duplicate scenario id: {0}")]
    DuplicateScenario(ScenarioId),
    /// Scenario group definition is malformed.
    #[error("scenario {scenario} is invalid: {reason}")]
    InvalidScenario {
        /// Offending scenario.
        scenario: ScenarioId,
        /// Reason.
        reason: String,
    },
}

// ============================================================================
// SECTION: Directive Catalog
// ============================================================================

/// Validated, immutable directive and scenario table.
///
/// # Invariants
/// - Directive ids are unique; prerequisites are known and acyclic.
/// - Exactly one escalation directive exists.
/// - Scenario sequences never list a directive before one of its prerequisites.
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveCatalog {
    /// Directives in declared (tie-break) order.
    directives: Vec<DirectiveSpec>,
    /// Scenario groups in declared order.
    scenarios: Vec<ScenarioSpec>,
    /// Directive id to declared position.
    #[serde(skip)]
    rank: BTreeMap<DirectiveId, usize>,
}

impl DirectiveCatalog {
    /// Validates and builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for the first invariant violation found.
    pub fn new(
        directives: Vec<DirectiveSpec>,
        scenarios: Vec<ScenarioSpec>,
    ) -> Result<Self, CatalogError> {
        if directives.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut rank = BTreeMap::new();
        for (index, directive) in directives.iter().enumerate() {
            if rank.insert(directive.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateDirective(directive.id.clone()));
            }
        }
        let catalog = Self {
            directives,
            scenarios,
            rank,
        };
        catalog.validate_directives()?;
        catalog.validate_acyclic()?;
        catalog.validate_scenarios()?;
        Ok(catalog)
    }

    /// Returns directives in declared order.
    #[must_use]
    pub fn directives(&self) -> &[DirectiveSpec] {
        &self.directives
    }

    /// Returns scenario groups in declared order.
    #[must_use]
    pub fn scenarios(&self) -> &[ScenarioSpec] {
        &self.scenarios
    }

    /// Looks up a directive by id.
    #[must_use]
    pub fn get(&self, id: &DirectiveId) -> Option<&DirectiveSpec> {
        self.rank.get(id).and_then(|index| self.directives.get(*index))
    }

    /// Returns the declared position of a directive.
    #[must_use]
    pub fn rank(&self, id: &DirectiveId) -> Option<usize> {
        self.rank.get(id).copied()
    }

    /// Returns the escalation directive.
    #[must_use]
    pub fn escalation(&self) -> Option<&DirectiveSpec> {
        self.directives.iter().find(|directive| directive.kind == DirectiveKind::Escalation)
    }

    /// Returns the group for a decision type, if declared.
    #[must_use]
    pub fn scenario_for_decision(&self, decision_type: DecisionType) -> Option<&ScenarioSpec> {
        self.scenarios.iter().find(|scenario| scenario.decision_type == Some(decision_type))
    }

    /// Returns the group for a pain signal, if declared.
    #[must_use]
    pub fn scenario_for_pain(&self, pain_signal: PainSignal) -> Option<&ScenarioSpec> {
        self.scenarios.iter().find(|scenario| scenario.pain_signal == Some(pain_signal))
    }

    /// Returns every transitive prerequisite of a directive.
    #[must_use]
    pub fn transitive_prerequisites(&self, id: &DirectiveId) -> BTreeSet<DirectiveId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<DirectiveId> =
            self.get(id).map(|directive| directive.prerequisites.clone()).unwrap_or_default();
        while let Some(next) = stack.pop() {
            if seen.insert(next.clone())
                && let Some(directive) = self.get(&next)
            {
                stack.extend(directive.prerequisites.iter().cloned());
            }
        }
        seen
    }

    /// Validates per-directive shape and references.
    fn validate_directives(&self) -> Result<(), CatalogError> {
        let escalations =
            self.directives.iter().filter(|d| d.kind == DirectiveKind::Escalation).count();
        if escalations != 1 {
            return Err(CatalogError::EscalationCount(escalations));
        }
        for directive in &self.directives {
            let invalid = |reason: &str| CatalogError::InvalidDirective {
                directive: directive.id.clone(),
                reason: reason.to_string(),
            };
            if directive.id.as_str().trim().is_empty() {
                return Err(invalid("id must be non-empty"));
            }
            for prerequisite in &directive.prerequisites {
                if prerequisite == &directive.id {
                    return Err(invalid("directive lists itself as a prerequisite"));
                }
                if !self.rank.contains_key(prerequisite) {
                    return Err(CatalogError::UnknownPrerequisite {
                        directive: directive.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
            let mut fields = BTreeSet::new();
            for field in directive.required_inputs.iter().chain(&directive.optional_inputs) {
                if field.trim().is_empty() {
                    return Err(invalid("input field names must be non-empty"));
                }
                if !fields.insert(field.as_str()) {
                    return Err(invalid("input field declared twice"));
                }
            }
            match directive.kind {
                DirectiveKind::Escalation => {
                    if !directive.conditions.is_empty() || directive.metric.is_some() {
                        return Err(invalid("escalation directives carry no gate"));
                    }
                }
                DirectiveKind::Gate => {
                    if directive.conditions.is_empty() {
                        return Err(invalid("gate directives need at least one condition"));
                    }
                }
            }
            if let Some(metric) = directive.metric {
                for field in metric.request_fields() {
                    if !directive.required_inputs.iter().any(|required| required == field) {
                        return Err(invalid(&format!(
                            "metric step reads `{field}` but it is not a required input"
                        )));
                    }
                }
            }
            for condition in &directive.conditions {
                if condition.field.trim().is_empty() {
                    return Err(invalid("condition field must be non-empty"));
                }
                if condition.comparator.takes_expected() != condition.expected.is_some() {
                    return Err(invalid(&format!(
                        "condition on `{}` has an expected value mismatch for its comparator",
                        condition.field
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rejects prerequisite cycles (depth-first, three-color).
    fn validate_acyclic(&self) -> Result<(), CatalogError> {
        /// Visit marker for depth-first search.
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            /// Not yet visited.
            New,
            /// On the current path.
            Active,
            /// Fully explored.
            Done,
        }

        /// Visits one node and its prerequisites.
        fn visit(
            catalog: &DirectiveCatalog,
            index: usize,
            marks: &mut [Mark],
        ) -> Result<(), CatalogError> {
            match marks.get(index).copied() {
                Some(Mark::Done) | None => return Ok(()),
                Some(Mark::Active) => {
                    let id = catalog
                        .directives
                        .get(index)
                        .map_or_else(|| DirectiveId::new(""), |d| d.id.clone());
                    return Err(CatalogError::PrerequisiteCycle(id));
                }
                Some(Mark::New) => {}
            }
            if let Some(mark) = marks.get_mut(index) {
                *mark = Mark::Active;
            }
            if let Some(directive) = catalog.directives.get(index) {
                for prerequisite in &directive.prerequisites {
                    if let Some(next) = catalog.rank(prerequisite) {
                        visit(catalog, next, marks)?;
                    }
                }
            }
            if let Some(mark) = marks.get_mut(index) {
                *mark = Mark::Done;
            }
            Ok(())
        }

        let mut marks = vec![Mark::New; self.directives.len()];
        for index in 0..self.directives.len() {
            visit(self, index, &mut marks)?;
        }
        Ok(())
    }

    /// Validates scenario selectors, references, and declared order.
    fn validate_scenarios(&self) -> Result<(), CatalogError> {
        let mut ids = BTreeSet::new();
        let mut decisions = BTreeSet::new();
        let mut pains = BTreeSet::new();
        for scenario in &self.scenarios {
            let invalid = |reason: String| CatalogError::InvalidScenario {
                scenario: scenario.id.clone(),
                reason,
            };
            if !ids.insert(scenario.id.clone()) {
                return Err(CatalogError::DuplicateScenario(scenario.id.clone()));
            }
            match (scenario.decision_type, scenario.pain_signal) {
                (Some(decision), None) => {
                    if !decisions.insert(decision) {
                        return Err(invalid(format!("second group for decision type {decision}")));
                    }
                }
                (None, Some(pain)) => {
                    if !pains.insert(pain) {
                        return Err(invalid(format!("second group for pain signal {pain}")));
                    }
                }
                _ => {
                    return Err(invalid(
                        "exactly one of decision_type or pain_signal must be set".to_string(),
                    ));
                }
            }
            if scenario.directives.is_empty() {
                return Err(invalid("directive sequence must be non-empty".to_string()));
            }
            let mut seen = BTreeSet::new();
            for (position, directive) in scenario.directives.iter().enumerate() {
                if !self.rank.contains_key(directive) {
                    return Err(invalid(format!("unknown directive {directive}")));
                }
                if !seen.insert(directive) {
                    return Err(invalid(format!("directive {directive} listed twice")));
                }
                let prerequisites = self.transitive_prerequisites(directive);
                if let Some(later) =
                    scenario.directives.iter().skip(position + 1).find(|d| prerequisites.contains(*d))
                {
                    return Err(invalid(format!(
                        "{directive} is listed before its prerequisite {later}"
                    )));
                }
            }
        }
        Ok(())
    }
}
