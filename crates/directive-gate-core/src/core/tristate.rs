// crates/directive-gate-core/src/core/tristate.rs
// ============================================================================
// Module: Directive Gate Tri-State Logic
// Description: Tri-state truth values for gate predicates.
// Purpose: Distinguish definite pass/fail from "cannot decide from this data".
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Gate predicates evaluate to `True`, `False`, or `Unknown`. Conjunction
//! follows strong Kleene logic: any `False` dominates, otherwise any `Unknown`
//! keeps the result undecided. `Unknown` never collapses to a pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tri-State Value
// ============================================================================

/// Tri-state truth value for predicate evaluation.
///
/// # Invariants
/// - Represents a closed set of truth values: true, false, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    /// Definitively true
    True,
    /// Definitively false
    False,
    /// Indeterminate from the supplied values
    Unknown,
}

impl TriState {
    /// Returns true if the value is `Unknown`
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Strong Kleene conjunction.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Folds an iterator of values with [`TriState::and`]; empty input is `True`.
    pub fn all(values: impl IntoIterator<Item = Self>) -> Self {
        values.into_iter().fold(Self::True, Self::and)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}
