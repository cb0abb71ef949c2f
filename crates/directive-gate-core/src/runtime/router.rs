// crates/directive-gate-core/src/runtime/router.rs
// ============================================================================
// Module: Directive Gate Decision Router
// Description: Orchestrates resolution, input checks, metrics, and gates.
// Purpose: Produce a structured routing result for one decision request.
// Dependencies: crate::{core, interfaces, runtime}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`DecisionRouter::route`] runs one request through the pipeline:
//!
//! 1. Gate 0: definitions must be current, otherwise nothing runs.
//! 2. The registry resolves the ordered directive list.
//! 3. Each directive checks prerequisites and inputs, derives its metrics,
//!    and evaluates its gate conditions.
//! 4. The first failed gate halts the route with its do-not advisories.
//! 5. When every gate passes the route escalates to the catalog's
//!    escalation directive.
//!
//! Missing inputs halt the route. Formula errors only block the directive
//! that raised them; dependents are blocked on their unmet prerequisite and
//! independent directives continue. Inputs are never mutated or defaulted.
//!
//! Security posture: request fields are untrusted; every read is typed and
//! validated before use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::AcquisitionCosts;
use crate::core::BlockReason;
use crate::core::CacInputs;
use crate::core::ChannelSpend;
use crate::core::ContributionWarning;
use crate::core::DEFAULT_HASH_ALGORITHM;
use crate::core::DecisionError;
use crate::core::DefinitionsStatus;
use crate::core::DirectiveId;
use crate::core::DirectiveKind;
use crate::core::DirectiveOutcome;
use crate::core::DirectiveSpec;
use crate::core::GateNumber;
use crate::core::GateState;
use crate::core::HashError;
use crate::core::MetricInputs;
use crate::core::MetricStep;
use crate::core::OrderContribution;
use crate::core::PolicyConstants;
use crate::core::RepeatProfile;
use crate::core::RouteDigests;
use crate::core::RoutingDecision;
use crate::core::RoutingRequest;
use crate::core::RoutingResult;
use crate::core::ScenarioSpec;
use crate::core::TriState;
use crate::core::directive::FIELD_BLENDED_CAC;
use crate::core::directive::FIELD_BOTTLENECKED_RESOURCES;
use crate::core::directive::FIELD_CHANNEL_CAC;
use crate::core::directive::FIELD_CONTRIBUTION_MARGIN;
use crate::core::directive::FIELD_GUARDRAIL_RATIO;
use crate::core::directive::FIELD_MAX_ALLOWABLE_CAC;
use crate::core::directive::FIELD_ORDER_CONTRIBUTION;
use crate::core::directive::FIELD_PEAK_UTILIZATION;
use crate::core::directive::FIELD_RAW_LTV;
use crate::core::directive::FIELD_USABLE_CAC;
use crate::core::directive::FIELD_USABLE_LTV;
use crate::interfaces::AuditPayloads;
use crate::interfaces::AuditSink;
use crate::interfaces::RoutingAuditEvent;
use crate::interfaces::RoutingAuditEventParams;
use crate::runtime::diagnostics::CapacityReport;
use crate::runtime::diagnostics::summarize_capacity;
use crate::runtime::formulas::MetricFormulaEngine;
use crate::runtime::gate::GateEvaluator;
use crate::runtime::gate::GateRun;
use crate::runtime::gate::GateTransitionError;
use crate::runtime::inputs::FieldReader;
use crate::runtime::inputs::InputResolver;
use crate::runtime::registry::DirectiveRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Recommendation when Gate 0 is closed.
const DEFINITIONS_RECOMMENDATION: &str = "Gate 0 failed: re-establish authoritative LTV and CAC \
                                          definitions before routing any decision.";
/// Advisory surfaced when Gate 0 is closed.
const DEFINITIONS_ADVISORY: &str =
    "Do not change pricing, marketing, or product mix until LTV/CAC are defined.";
/// Recommendation when intent is ambiguous.
const CLARIFICATION_RECOMMENDATION: &str =
    "Answer the clarifying question so the decision can be routed.";
/// Recommendation when directives are blocked on invalid input.
const UNRESOLVED_RECOMMENDATION: &str =
    "Correct the invalid inputs on the blocked directives and route again.";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Routing failures that are not business outcomes.
///
/// Business outcomes (stops, missing input, ambiguity) are reported inside
/// [`RoutingResult`]; these errors indicate a broken invariant or an audit
/// failure.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The gate lifecycle rejected a transition.
    #[error(transparent)]
    Transition(#[from] GateTransitionError),
    /// Audit hashing failed.
    #[error("routing audit failed: {0}")]
    Hash(#[from] HashError),
    /// An opted-in audit payload could not be rendered as JSON.
    #[error("routing audit payload failed: {0}")]
    Payload(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Decision Router
// ============================================================================

/// Deterministic decision router.
///
/// # Invariants
/// - Registry, policy, and definitions status are read-only after construction.
/// - Routing never mutates the request.
#[derive(Debug, Clone)]
pub struct DecisionRouter {
    /// Directive registry.
    registry: DirectiveRegistry,
    /// Gate 0 status.
    definitions: DefinitionsStatus,
    /// Formula engine bound to the policy.
    formulas: MetricFormulaEngine,
    /// Gate evaluator bound to the policy.
    evaluator: GateEvaluator,
}

impl DecisionRouter {
    /// Creates a router after validating the policy constants.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] naming the offending policy constant.
    pub fn new(
        registry: DirectiveRegistry,
        policy: PolicyConstants,
        definitions: DefinitionsStatus,
    ) -> Result<Self, DecisionError> {
        policy.validate()?;
        Ok(Self {
            registry,
            definitions,
            formulas: MetricFormulaEngine::new(policy),
            evaluator: GateEvaluator::new(policy),
        })
    }

    /// Returns the directive registry.
    #[must_use]
    pub const fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Returns the policy constants in use.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConstants {
        self.formulas.policy()
    }

    /// Returns the Gate 0 status.
    #[must_use]
    pub const fn definitions(&self) -> DefinitionsStatus {
        self.definitions
    }

    /// Routes one request.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Transition`] if the gate lifecycle is violated.
    pub fn route(&self, request: &RoutingRequest) -> Result<RoutingResult, RouteError> {
        if !self.definitions.is_current() {
            return Ok(definitions_stop(request));
        }
        let resolution = match self.registry.resolve(
            request.decision_type,
            request.pain_signal,
            &request.intent_keywords,
        ) {
            Ok(resolution) => resolution,
            Err(error) => return Ok(clarification(request, error)),
        };

        let catalog = self.registry.catalog();
        let groups: Vec<&ScenarioSpec> = resolution
            .scenarios
            .iter()
            .filter_map(|id| catalog.scenarios().iter().find(|scenario| &scenario.id == id))
            .collect();
        let mut result = empty_result(request);
        result.scenarios.clone_from(&resolution.scenarios);
        result.directives_resolved.clone_from(&resolution.directives);
        for group in &groups {
            if !group.why.is_empty() {
                result.rationale.push(group.why.clone());
            }
            push_unique(&mut result.required_inputs, &group.required_inputs);
        }

        let mut fields = request.provided_fields.clone();
        let mut warnings = Vec::new();
        let mut states: BTreeMap<DirectiveId, GateState> = BTreeMap::new();
        let mut halted = false;
        for id in &resolution.directives {
            let Some(directive) = catalog.get(id) else {
                continue;
            };
            if directive.kind == DirectiveKind::Escalation {
                continue;
            }
            let outcome =
                self.run_directive(directive, request, &mut fields, &mut warnings, &states)?;
            states.insert(id.clone(), outcome.state);
            match outcome.state {
                GateState::Blocked(BlockReason::MissingInput) => {
                    result.missing_inputs.clone_from(&outcome.missing_inputs);
                    result.halt_error = Some(DecisionError::MissingInput {
                        directive: id.clone(),
                        fields: outcome.missing_inputs.clone(),
                    });
                    result.decision = RoutingDecision::NeedsInput {
                        directive: id.clone(),
                    };
                    result.recommendation = format!(
                        "Provide {} to run {}.",
                        outcome.missing_inputs.join(", "),
                        directive.title
                    );
                    halted = true;
                }
                GateState::Blocked(BlockReason::UnmetPrerequisite) => {
                    result.unmet_prerequisites.push(id.clone());
                }
                GateState::FailedStop => {
                    result.directives_executed.push(id.clone());
                    result.decision = RoutingDecision::Stop {
                        directive: id.clone(),
                    };
                    result.recommendation.clone_from(&directive.stop_recommendation);
                    push_unique(&mut result.advisories, &directive.do_not);
                    halted = true;
                }
                _ => result.directives_executed.push(id.clone()),
            }
            result.outcomes.push(outcome);
            if halted {
                break;
            }
        }

        for group in &groups {
            push_unique(&mut result.advisories, &group.stop_conditions);
        }
        result.warnings = warnings;
        for (name, value) in &fields {
            if !request.provided_fields.contains_key(name) {
                result.metrics.insert(name.clone(), value.clone());
            }
        }
        if !halted {
            finish_unhalted(&mut result, catalog.escalation());
        }
        Ok(result)
    }

    /// Routes one request and records an audit event.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when routing fails or the audit event cannot be
    /// built from the request and result.
    pub fn route_audited(
        &self,
        request: &RoutingRequest,
        sink: &dyn AuditSink,
        payloads: AuditPayloads,
    ) -> Result<RoutingResult, RouteError> {
        let result = self.route(request)?;
        let digests = RouteDigests::compute(DEFAULT_HASH_ALGORITHM, request, &result)?;
        let (request_payload, result_payload) = match payloads {
            AuditPayloads::HashOnly => (None, None),
            AuditPayloads::Full => {
                (Some(serde_json::to_value(request)?), Some(serde_json::to_value(&result)?))
            }
        };
        let stopping_directive = match &result.decision {
            RoutingDecision::Stop {
                directive,
            }
            | RoutingDecision::NeedsInput {
                directive,
            } => Some(directive.clone()),
            _ => None,
        };
        sink.record(&RoutingAuditEvent::new(RoutingAuditEventParams {
            decision: result.decision.label(),
            stopping_directive,
            executed_count: result.directives_executed.len(),
            passed_count: result.passed_count(),
            request_hash: digests.request_hash,
            result_hash: digests.result_hash,
            request: request_payload,
            result: result_payload,
            payloads,
        }));
        Ok(result)
    }

    /// Runs one directive through its gate lifecycle.
    fn run_directive(
        &self,
        directive: &DirectiveSpec,
        request: &RoutingRequest,
        fields: &mut BTreeMap<String, Value>,
        warnings: &mut Vec<ContributionWarning>,
        states: &BTreeMap<DirectiveId, GateState>,
    ) -> Result<DirectiveOutcome, RouteError> {
        let mut run = GateRun::new(directive.id.clone());
        let mut outcome = DirectiveOutcome {
            directive: directive.id.clone(),
            gate: directive.gate,
            state: run.state(),
            missing_inputs: Vec::new(),
            unmet_prerequisites: Vec::new(),
            error: None,
            trace: Vec::new(),
        };

        outcome.unmet_prerequisites = directive
            .prerequisites
            .iter()
            .filter(|prerequisite| states.get(*prerequisite) != Some(&GateState::Passed))
            .cloned()
            .collect();
        if !outcome.unmet_prerequisites.is_empty() {
            run.transition(GateState::Blocked(BlockReason::UnmetPrerequisite))?;
            outcome.state = run.state();
            return Ok(outcome);
        }

        outcome.missing_inputs =
            InputResolver::check_completeness(directive, &request.provided_fields);
        if !outcome.missing_inputs.is_empty() {
            run.transition(GateState::Blocked(BlockReason::MissingInput))?;
            outcome.state = run.state();
            return Ok(outcome);
        }

        run.transition(GateState::Running)?;
        if let Some(step) = directive.metric {
            match self.derive_metrics(step, fields, warnings) {
                Ok(derived) => fields.extend(derived),
                Err(error) => {
                    run.transition(GateState::Blocked(BlockReason::InvalidInput))?;
                    outcome.state = run.state();
                    outcome.error = Some(error);
                    return Ok(outcome);
                }
            }
        }

        let evaluation = self.evaluator.evaluate(directive, fields);
        let next = match evaluation.status {
            TriState::True => GateState::Passed,
            TriState::False => GateState::FailedStop,
            TriState::Unknown => {
                let field = evaluation
                    .trace
                    .iter()
                    .find(|entry| entry.status.is_unknown())
                    .map_or_else(|| directive.id.to_string(), |entry| entry.field.clone());
                outcome.error = Some(DecisionError::invalid(
                    field,
                    "value is absent or cannot be compared with the gate threshold",
                ));
                GateState::Blocked(BlockReason::InvalidInput)
            }
        };
        run.transition(next)?;
        outcome.state = run.state();
        outcome.trace = evaluation.trace;
        Ok(outcome)
    }

    /// Computes the derived fields for a metric step.
    fn derive_metrics(
        &self,
        step: MetricStep,
        fields: &BTreeMap<String, Value>,
        warnings: &mut Vec<ContributionWarning>,
    ) -> Result<Vec<(String, Value)>, DecisionError> {
        let reader = FieldReader::new(fields);
        let mut derived = Vec::new();
        match step {
            MetricStep::OrderContribution => {
                let contribution = self.contribution(&reader)?;
                push_contribution(&mut derived, warnings, &contribution)?;
            }
            MetricStep::Ltv => {
                let contribution = self.contribution(&reader)?;
                let profile: RepeatProfile = reader.parse("repeat_profile")?;
                let horizon = reader.integer("horizon_months")?;
                let orders = self.formulas.expected_orders(&profile, contribution.contribution)?;
                let ltv = self.formulas.compute_expected_ltv(&orders, horizon)?;
                push_contribution(&mut derived, warnings, &contribution)?;
                push_number(&mut derived, FIELD_RAW_LTV, ltv.raw)?;
                push_number(&mut derived, FIELD_USABLE_LTV, ltv.usable)?;
            }
            MetricStep::Cac => {
                let inputs = CacInputs {
                    costs: AcquisitionCosts {
                        paid: reader.number("paid_acquisition_cost")?,
                        allocated: reader.number("allocated_acquisition_cost")?,
                        labor: reader.number("acquisition_labor_cost")?,
                    },
                    new_customers: reader.count("new_customers")?,
                    channels: reader
                        .parse_optional::<BTreeMap<String, ChannelSpend>>("acquisition_channels")?
                        .unwrap_or_default(),
                };
                let cac = self.formulas.compute_cac(&inputs)?;
                push_number(&mut derived, FIELD_BLENDED_CAC, cac.blended)?;
                push_number(&mut derived, FIELD_USABLE_CAC, cac.usable)?;
                let mut channels = serde_json::Map::new();
                for (name, value) in &cac.channels {
                    channels.insert(name.clone(), finite(FIELD_CHANNEL_CAC, *value)?);
                }
                derived.push((FIELD_CHANNEL_CAC.to_string(), Value::Object(channels)));
            }
            MetricStep::Guardrail => {
                let usable_ltv = reader.number(FIELD_USABLE_LTV)?;
                let usable_cac = reader.number(FIELD_USABLE_CAC)?;
                let guardrail = self.formulas.guardrail_from_usable(usable_ltv, usable_cac)?;
                push_number(&mut derived, FIELD_GUARDRAIL_RATIO, guardrail.ratio)?;
                push_number(&mut derived, FIELD_MAX_ALLOWABLE_CAC, guardrail.max_allowable_cac)?;
            }
            MetricStep::Capacity => {
                let report: CapacityReport = reader.parse("capacity_report")?;
                let summary = summarize_capacity(&report)?;
                push_number(&mut derived, FIELD_PEAK_UTILIZATION, summary.peak_utilization)?;
                derived.push((
                    FIELD_BOTTLENECKED_RESOURCES.to_string(),
                    Value::Array(
                        summary.bottlenecked_resources.into_iter().map(Value::String).collect(),
                    ),
                ));
            }
        }
        Ok(derived)
    }

    /// Reads metric inputs and computes contribution.
    fn contribution(&self, reader: &FieldReader<'_>) -> Result<OrderContribution, DecisionError> {
        let inputs = MetricInputs {
            price: reader.number("price")?,
            cogs: reader.number("cogs")?,
            variable_labor: reader.number("variable_labor")?,
            packaging: reader.number("packaging")?,
            shipping: reader.number("shipping")?,
            fees: reader.number("fees")?,
            refund_allowance: reader.number("refund_allowance")?,
        };
        self.formulas.compute_order_contribution(&inputs)
    }
}

// ============================================================================
// SECTION: Result Builders
// ============================================================================

/// Creates a result with the request classification and nothing executed.
fn empty_result(request: &RoutingRequest) -> RoutingResult {
    RoutingResult {
        decision_type: request.decision_type,
        pain_signal: request.pain_signal,
        time_horizon: request.time_horizon,
        scenarios: Vec::new(),
        directives_resolved: Vec::new(),
        directives_executed: Vec::new(),
        outcomes: Vec::new(),
        decision: RoutingDecision::NeedsClarification,
        recommendation: String::new(),
        rationale: Vec::new(),
        required_inputs: Vec::new(),
        unmet_prerequisites: Vec::new(),
        missing_inputs: Vec::new(),
        advisories: Vec::new(),
        warnings: Vec::new(),
        metrics: BTreeMap::new(),
        halt_error: None,
    }
}

/// Builds the Gate 0 stop result.
fn definitions_stop(request: &RoutingRequest) -> RoutingResult {
    let mut result = empty_result(request);
    result.decision = RoutingDecision::DefinitionsStop {
        gate: GateNumber::DEFINITIONS,
    };
    result.recommendation = DEFINITIONS_RECOMMENDATION.to_string();
    result.advisories.push(DEFINITIONS_ADVISORY.to_string());
    result.halt_error = Some(DecisionError::DefinitionsNotAuthoritative {
        gate: GateNumber::DEFINITIONS,
    });
    result
}

/// Builds the clarification result for an unresolvable intent.
fn clarification(request: &RoutingRequest, error: DecisionError) -> RoutingResult {
    let mut result = empty_result(request);
    result.recommendation = CLARIFICATION_RECOMMENDATION.to_string();
    result.halt_error = Some(error);
    result
}

/// Sets the final decision when no directive halted the route.
fn finish_unhalted(result: &mut RoutingResult, escalation: Option<&DirectiveSpec>) {
    let blocked: Vec<DirectiveId> = result
        .outcomes
        .iter()
        .filter(|outcome| matches!(outcome.state, GateState::Blocked(_)))
        .map(|outcome| outcome.directive.clone())
        .collect();
    match escalation {
        Some(escalation) if blocked.is_empty() => {
            result.decision = RoutingDecision::Escalate {
                directive: escalation.id.clone(),
            };
            result.recommendation = format!(
                "All diagnostics passed; proceed to {}.",
                escalation.title
            );
        }
        _ => {
            result.decision = RoutingDecision::Unresolved {
                blocked,
            };
            result.recommendation = UNRESOLVED_RECOMMENDATION.to_string();
        }
    }
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Appends entries not already present, preserving order.
fn push_unique(target: &mut Vec<String>, entries: &[String]) {
    for entry in entries {
        if !target.contains(entry) {
            target.push(entry.clone());
        }
    }
}

/// Converts a derived number into a JSON value.
fn finite(field: &str, value: f64) -> Result<Value, DecisionError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| DecisionError::invalid(field, "derived value is not finite"))
}

/// Appends a derived number.
fn push_number(
    derived: &mut Vec<(String, Value)>,
    field: &str,
    value: f64,
) -> Result<(), DecisionError> {
    derived.push((field.to_string(), finite(field, value)?));
    Ok(())
}

/// Appends contribution, margin when defined, and any new warnings.
fn push_contribution(
    derived: &mut Vec<(String, Value)>,
    warnings: &mut Vec<ContributionWarning>,
    contribution: &OrderContribution,
) -> Result<(), DecisionError> {
    for warning in &contribution.warnings {
        if !warnings.contains(warning) {
            warnings.push(*warning);
        }
    }
    push_number(derived, FIELD_ORDER_CONTRIBUTION, contribution.contribution)?;
    if let Some(margin) = contribution.margin {
        push_number(derived, FIELD_CONTRIBUTION_MARGIN, margin)?;
    }
    Ok(())
}
