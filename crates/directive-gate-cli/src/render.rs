// crates/directive-gate-cli/src/render.rs
// ============================================================================
// Module: CLI Report Rendering
// Description: Text rendering for routing results and directive listings.
// Purpose: Produce the operator-facing routing report.
// Dependencies: directive-gate-core
// ============================================================================

//! ## Overview
//! Renders a [`RoutingResult`] as a plain-text report with fixed sections:
//! the routed decision, why this comes next, required inputs, explicit stop
//! conditions, contribution warnings, per-directive states, derived metrics,
//! and classification.
//! Every string comes from the message catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use directive_gate_core::DecisionError;
use directive_gate_core::DirectiveCatalog;
use directive_gate_core::DirectiveId;
use directive_gate_core::GateNumber;
use directive_gate_core::RoutingDecision;
use directive_gate_core::RoutingResult;

use crate::t;

// ============================================================================
// SECTION: Routing Report
// ============================================================================

/// Renders the text routing report.
#[must_use]
pub fn route_report(result: &RoutingResult, catalog: &DirectiveCatalog) -> String {
    let mut out = String::new();
    line(&mut out, &t!("report.header", decision = decision_text(&result.decision, catalog)));
    if !result.recommendation.is_empty() {
        line(&mut out, &t!("report.recommendation", text = &result.recommendation));
    }

    if let Some(DecisionError::AmbiguousIntent {
        question,
        options,
    }) = &result.halt_error
    {
        line(&mut out, "");
        line(&mut out, &t!("report.question", question = question));
        for (index, option) in options.iter().enumerate() {
            line(&mut out, &t!("report.option", index = index + 1, option = option));
        }
    }

    section(&mut out, &t!("report.section.why"), &result.rationale);
    section(&mut out, &t!("report.section.required_inputs"), &result.required_inputs);
    if !result.missing_inputs.is_empty() {
        section(&mut out, &t!("report.section.missing_inputs"), &result.missing_inputs);
    }
    section(&mut out, &t!("report.section.stop_conditions"), &result.advisories);
    if !result.warnings.is_empty() {
        let messages: Vec<String> =
            result.warnings.iter().map(|warning| warning.message().to_string()).collect();
        section(&mut out, &t!("report.section.warnings"), &messages);
    }

    if !result.outcomes.is_empty() {
        line(&mut out, "");
        line(&mut out, &t!("report.section.directives"));
        for outcome in &result.outcomes {
            line(
                &mut out,
                &t!(
                    "report.directive",
                    directive = outcome.directive,
                    gate = gate_suffix(outcome.gate),
                    state = outcome.state
                ),
            );
        }
    }

    if !result.metrics.is_empty() {
        line(&mut out, "");
        line(&mut out, &t!("report.section.metrics"));
        for (name, value) in &result.metrics {
            line(&mut out, &t!("report.metric", name = name, value = value));
        }
    }

    line(&mut out, "");
    line(&mut out, &t!("report.section.classification"));
    let none = t!("report.none");
    line(
        &mut out,
        &t!(
            "report.classification.decision_type",
            value = result.decision_type.map_or_else(|| none.clone(), |value| value.to_string())
        ),
    );
    line(
        &mut out,
        &t!(
            "report.classification.pain_signal",
            value = result.pain_signal.map_or(none, |value| value.to_string())
        ),
    );
    line(&mut out, &t!("report.classification.time_horizon", value = result.time_horizon));
    out
}

/// Describes the final decision, naming directives by title.
fn decision_text(decision: &RoutingDecision, catalog: &DirectiveCatalog) -> String {
    match decision {
        RoutingDecision::Escalate {
            directive,
        } => t!("report.decision.escalate", title = title(catalog, directive), directive = directive),
        RoutingDecision::Stop {
            directive,
        } => t!("report.decision.stop", title = title(catalog, directive), directive = directive),
        RoutingDecision::DefinitionsStop {
            gate,
        } => t!("report.decision.definitions_stop", gate = gate),
        RoutingDecision::NeedsInput {
            directive,
        } => t!(
            "report.decision.needs_input",
            title = title(catalog, directive),
            directive = directive
        ),
        RoutingDecision::NeedsClarification => t!("report.decision.needs_clarification"),
        RoutingDecision::Unresolved {
            blocked,
        } => {
            let names: Vec<&str> = blocked.iter().map(DirectiveId::as_str).collect();
            t!("report.decision.unresolved", blocked = names.join(", "))
        }
    }
}

// ============================================================================
// SECTION: Directive Listing
// ============================================================================

/// Renders the catalog's directives in declared order.
#[must_use]
pub fn directive_listing(catalog: &DirectiveCatalog) -> String {
    let mut out = String::new();
    for directive in catalog.directives() {
        line(
            &mut out,
            &t!(
                "directives.list.entry",
                directive = directive.id,
                gate = gate_suffix(directive.gate),
                title = &directive.title
            ),
        );
        if !directive.prerequisites.is_empty() {
            let names: Vec<&str> = directive.prerequisites.iter().map(DirectiveId::as_str).collect();
            line(&mut out, &t!("directives.list.prerequisites", prerequisites = names.join(", ")));
        }
        if !directive.required_inputs.is_empty() {
            line(&mut out, &t!("directives.list.inputs", inputs = directive.required_inputs.join(", ")));
        }
    }
    out
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends one line.
fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "{text}");
}

/// Appends a titled bullet list, with a placeholder when empty.
fn section(out: &mut String, title: &str, items: &[String]) {
    line(out, "");
    line(out, title);
    if items.is_empty() {
        line(out, &t!("report.item.none"));
    }
    for item in items {
        line(out, &t!("report.item", item = item));
    }
}

/// Directive title, falling back to the id.
fn title(catalog: &DirectiveCatalog, id: &DirectiveId) -> String {
    catalog.get(id).map_or_else(|| id.to_string(), |directive| directive.title.clone())
}

/// Bracketed gate label, or empty for unnumbered directives.
fn gate_suffix(gate: Option<GateNumber>) -> String {
    gate.map(|gate| t!("report.directive.gate", gate = gate)).unwrap_or_default()
}
