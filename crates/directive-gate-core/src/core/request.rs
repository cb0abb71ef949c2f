// crates/directive-gate-core/src/core/request.rs
// ============================================================================
// Module: Directive Gate Routing Request
// Description: Pre-classified intent plus the operator's provided fields.
// Purpose: Define the single input record accepted by the router.
// Dependencies: crate::core::intent, serde, serde_json
// ============================================================================

//! ## Overview
//! A routing request carries classification enums, optional free-form intent
//! keywords, and a map of provided fields. Field values are opaque JSON; the
//! router reads them through typed readers and never mutates them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::intent::DecisionType;
use crate::core::intent::PainSignal;
use crate::core::intent::TimeHorizon;

// ============================================================================
// SECTION: Routing Request
// ============================================================================

/// Routing request.
///
/// # Invariants
/// - A field explicitly set to `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingRequest {
    /// What the operator is deciding, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_type: Option<DecisionType>,
    /// What currently feels broken, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_signal: Option<PainSignal>,
    /// How soon the decision has to land.
    #[serde(default)]
    pub time_horizon: TimeHorizon,
    /// Keywords matched against scenario and directive triggers.
    #[serde(default)]
    pub intent_keywords: Vec<String>,
    /// Provided field values keyed by field name.
    #[serde(default)]
    pub provided_fields: BTreeMap<String, Value>,
}

impl RoutingRequest {
    /// Creates a request for a decision type with no fields.
    #[must_use]
    pub fn for_decision(decision_type: DecisionType) -> Self {
        Self {
            decision_type: Some(decision_type),
            ..Self::default()
        }
    }

    /// Adds or replaces a provided field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.provided_fields.insert(name.into(), value);
        self
    }
}
