// crates/directive-gate-core/src/runtime/inputs.rs
// ============================================================================
// Module: Directive Gate Input Resolution
// Description: Required-input completeness checks and typed field readers.
// Purpose: Decide whether a directive may run, and read its inputs without defaulting.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! [`InputResolver::check_completeness`] is a pure set difference between a
//! directive's required fields and the provided fields; `null` counts as
//! missing. [`FieldReader`] reads typed values from a field map and reports
//! type errors as `InvalidInput` naming the field. Nothing is ever defaulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::DecisionError;
use crate::core::DirectiveSpec;

// ============================================================================
// SECTION: Input Resolver
// ============================================================================

/// Completeness checks for directive inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputResolver;

impl InputResolver {
    /// Returns required fields that are absent or `null`, in declaration order.
    #[must_use]
    pub fn check_completeness(
        directive: &DirectiveSpec,
        provided_fields: &BTreeMap<String, Value>,
    ) -> Vec<String> {
        directive
            .required_inputs
            .iter()
            .filter(|field| provided_fields.get(*field).is_none_or(Value::is_null))
            .cloned()
            .collect()
    }
}

// ============================================================================
// SECTION: Field Reader
// ============================================================================

/// Typed, read-only view over a field map.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    /// Fields keyed by name.
    fields: &'a BTreeMap<String, Value>,
}

impl<'a> FieldReader<'a> {
    /// Wraps a field map.
    #[must_use]
    pub const fn new(fields: &'a BTreeMap<String, Value>) -> Self {
        Self {
            fields,
        }
    }

    /// Returns a present, non-null value.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the field is absent or null.
    pub fn value(&self, field: &str) -> Result<&'a Value, DecisionError> {
        match self.fields.get(field) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(DecisionError::invalid(field, "value is absent")),
        }
    }

    /// Returns an optional value; `null` reads as absent.
    #[must_use]
    pub fn optional(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    /// Reads a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the value is absent, not a
    /// number, or not finite.
    pub fn number(&self, field: &str) -> Result<f64, DecisionError> {
        let value = self.value(field)?;
        value
            .as_f64()
            .filter(|number| number.is_finite())
            .ok_or_else(|| DecisionError::invalid(field, "must be a finite number"))
    }

    /// Reads a signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the value is absent or not an integer.
    pub fn integer(&self, field: &str) -> Result<i64, DecisionError> {
        let value = self.value(field)?;
        value.as_i64().ok_or_else(|| DecisionError::invalid(field, "must be an integer"))
    }

    /// Reads a non-negative count.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the value is absent, negative,
    /// fractional, or too large.
    pub fn count(&self, field: &str) -> Result<u32, DecisionError> {
        let value = self.value(field)?;
        value
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .ok_or_else(|| DecisionError::invalid(field, "must be a non-negative integer count"))
    }

    /// Deserializes a structured value.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the value is absent or malformed.
    pub fn parse<T: DeserializeOwned>(&self, field: &str) -> Result<T, DecisionError> {
        let value = self.value(field)?;
        decode(field, value)
    }

    /// Deserializes an optional structured value.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when a present value is malformed.
    pub fn parse_optional<T: DeserializeOwned>(
        &self,
        field: &str,
    ) -> Result<Option<T>, DecisionError> {
        self.optional(field)
            .map(|value| decode(field, value))
            .transpose()
    }
}

/// Deserializes a JSON value, naming the field on failure.
fn decode<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T, DecisionError> {
    serde_json::from_value(value.clone())
        .map_err(|err| DecisionError::invalid(field, err.to_string()))
}
