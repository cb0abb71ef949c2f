// crates/directive-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Directive Gate CLI stores user-facing strings in a small translation
//! catalog to enforce consistent messaging and to prepare for future locales.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the message bundle.
pub(crate) const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "directive-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.serialize_failed", "Failed to serialize {kind}: {error}"),
    ("input.kind.request", "routing request"),
    ("input.kind.metrics", "metric input"),
    ("input.read_failed", "Failed to read {kind} file at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.parse_failed", "Failed to parse {kind} JSON at {path}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("route.init_failed", "Failed to build router: {error}"),
    ("route.failed", "Routing failed: {error}"),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("metrics.failed", "Metric computation failed: {error}"),
    ("report.header", "Decision Routed To: {decision}"),
    ("report.decision.escalate", "Escalate to {title} ({directive})"),
    ("report.decision.stop", "Stop at {title} ({directive})"),
    ("report.decision.definitions_stop", "Definitions stop at {gate}"),
    ("report.decision.needs_input", "Needs input for {title} ({directive})"),
    ("report.decision.needs_clarification", "Needs clarification"),
    ("report.decision.unresolved", "Unresolved (blocked: {blocked})"),
    ("report.recommendation", "Recommendation: {text}"),
    ("report.section.why", "Why This Comes Next:"),
    ("report.section.required_inputs", "Required Inputs:"),
    ("report.section.missing_inputs", "Missing Inputs:"),
    ("report.section.stop_conditions", "Explicit Stop Conditions:"),
    ("report.section.warnings", "Contribution Warnings:"),
    ("report.section.directives", "Directives:"),
    ("report.section.metrics", "Metrics:"),
    ("report.section.classification", "Classification:"),
    ("report.question", "Clarifying Question: {question}"),
    ("report.option", "{index}. {option}"),
    ("report.item", "- {item}"),
    ("report.item.none", "- (none)"),
    ("report.directive", "- {directive}{gate}: {state}"),
    ("report.directive.gate", " [{gate}]"),
    ("report.metric", "- {name}: {value}"),
    ("report.classification.decision_type", "- Decision type: {value}"),
    ("report.classification.pain_signal", "- Pain signal: {value}"),
    ("report.classification.time_horizon", "- Time horizon: {value}"),
    ("report.none", "none"),
    ("directives.list.entry", "{directive}{gate}: {title}"),
    ("directives.list.prerequisites", "  prerequisites: {prerequisites}"),
    ("directives.list.inputs", "  required inputs: {inputs}"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static English catalog used by the CLI.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
