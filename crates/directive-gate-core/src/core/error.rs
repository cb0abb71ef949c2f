// crates/directive-gate-core/src/core/error.rs
// ============================================================================
// Module: Directive Gate Decision Errors
// Description: Error taxonomy for formulas, input checks, and routing halts.
// Purpose: Name the offending field or directive in every failure.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`DecisionError`] is the single error taxonomy shared by the formula
//! engine, the input resolver, the registry, and the router. Errors are
//! serializable so they can be embedded in routing outcomes verbatim.
//!
//! Propagation:
//! - `InvalidInput` and `DivisionByZero` block only the directive whose
//!   formula raised them.
//! - `MissingInput` and `DefinitionsNotAuthoritative` halt the routing call.
//! - `AmbiguousIntent` halts before any directive runs and carries exactly one
//!   clarifying question.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::DirectiveId;
use crate::core::identifiers::GateNumber;

// ============================================================================
// SECTION: Decision Error
// ============================================================================

/// Errors surfaced by formula evaluation and routing.
///
/// # Invariants
/// - Every variant names the field, directive, or gate responsible.
/// - Variants are stable for serialization (`kind` tag, snake case).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionError {
    /// Malformed or out-of-range input value.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        /// Offending field name.
        field: String,
        /// Human-readable reason.
        reason: String,
    },
    /// A divisor evaluated to zero.
    #[error("division by zero: `{field}` is zero")]
    DivisionByZero {
        /// Field whose zero value would have been the divisor.
        field: String,
    },
    /// Required fields were absent or explicitly null.
    #[error("directive `{directive}` is missing required input: {}", fields.join(", "))]
    MissingInput {
        /// Directive that requested the fields.
        directive: DirectiveId,
        /// Missing field names in declaration order.
        fields: Vec<String>,
    },
    /// Intent could not be mapped to a single, consistent directive sequence.
    #[error("ambiguous intent: {question}")]
    AmbiguousIntent {
        /// The single clarifying question to ask.
        question: String,
        /// Answer options, in presentation order.
        options: Vec<String>,
    },
    /// LTV/CAC definitions are not current, so no routing is authoritative.
    #[error("{gate} failed: LTV/CAC definitions are not current; no other routing is allowed")]
    DefinitionsNotAuthoritative {
        /// Gate that refused to open.
        gate: GateNumber,
    },
}

impl DecisionError {
    /// Builds an [`DecisionError::InvalidInput`] for the named field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`DecisionError::DivisionByZero`] for the named field.
    #[must_use]
    pub fn division_by_zero(field: impl Into<String>) -> Self {
        Self::DivisionByZero {
            field: field.into(),
        }
    }

    /// Returns true when the error blocks only the directive that raised it.
    #[must_use]
    pub const fn is_formula_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::DivisionByZero { .. })
    }
}
