// crates/directive-gate-core/src/core/policy.rs
// ============================================================================
// Module: Directive Gate Policy Constants
// Description: Named thresholds and definition status shared by all routing calls.
// Purpose: Keep policy numbers as configuration rather than literals.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Policy constants are process-wide and read-only after construction.
//! Gate predicates refer to them by [`PolicyKey`] so a threshold change never
//! touches directive definitions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::DecisionError;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default minimum usable LTV to usable CAC ratio.
pub const DEFAULT_GUARDRAIL_RATIO: f64 = 12.0;
/// Default conservative discount applied to raw LTV.
pub const DEFAULT_LTV_DISCOUNT_FACTOR: f64 = 0.80;
/// Default risk buffer applied to blended CAC.
pub const DEFAULT_CAC_RISK_BUFFER: f64 = 1.20;
/// Default exclusive upper bound on peak resource utilization.
pub const DEFAULT_MAX_CAPACITY_UTILIZATION: f64 = 0.85;

// ============================================================================
// SECTION: Policy Constants
// ============================================================================

/// Policy thresholds applied by formulas and gate predicates.
///
/// # Invariants
/// - `guardrail_ratio > 0`, `ltv_discount_factor` in `(0, 1]`,
///   `cac_risk_buffer >= 1`, `max_capacity_utilization` in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConstants {
    /// Minimum usable LTV ÷ usable CAC (inclusive).
    #[serde(default = "default_guardrail_ratio")]
    pub guardrail_ratio: f64,
    /// Multiplier applied to raw LTV.
    #[serde(default = "default_ltv_discount_factor")]
    pub ltv_discount_factor: f64,
    /// Multiplier applied to blended CAC.
    #[serde(default = "default_cac_risk_buffer")]
    pub cac_risk_buffer: f64,
    /// Peak utilization must stay strictly below this bound.
    #[serde(default = "default_max_capacity_utilization")]
    pub max_capacity_utilization: f64,
}

impl Default for PolicyConstants {
    fn default() -> Self {
        Self {
            guardrail_ratio: DEFAULT_GUARDRAIL_RATIO,
            ltv_discount_factor: DEFAULT_LTV_DISCOUNT_FACTOR,
            cac_risk_buffer: DEFAULT_CAC_RISK_BUFFER,
            max_capacity_utilization: DEFAULT_MAX_CAPACITY_UTILIZATION,
        }
    }
}

impl PolicyConstants {
    /// Validates ranges for every constant.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] naming the first out-of-range constant.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if !self.guardrail_ratio.is_finite() || self.guardrail_ratio <= 0.0 {
            return Err(DecisionError::invalid("guardrail_ratio", "must be finite and > 0"));
        }
        if !self.ltv_discount_factor.is_finite()
            || self.ltv_discount_factor <= 0.0
            || self.ltv_discount_factor > 1.0
        {
            return Err(DecisionError::invalid("ltv_discount_factor", "must be in (0, 1]"));
        }
        if !self.cac_risk_buffer.is_finite() || self.cac_risk_buffer < 1.0 {
            return Err(DecisionError::invalid("cac_risk_buffer", "must be finite and >= 1"));
        }
        if !self.max_capacity_utilization.is_finite()
            || self.max_capacity_utilization <= 0.0
            || self.max_capacity_utilization > 1.0
        {
            return Err(DecisionError::invalid("max_capacity_utilization", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Returns the value of a named constant.
    #[must_use]
    pub const fn value(&self, key: PolicyKey) -> f64 {
        match key {
            PolicyKey::GuardrailRatio => self.guardrail_ratio,
            PolicyKey::LtvDiscountFactor => self.ltv_discount_factor,
            PolicyKey::CacRiskBuffer => self.cac_risk_buffer,
            PolicyKey::MaxCapacityUtilization => self.max_capacity_utilization,
        }
    }
}

/// Serde default for the guardrail ratio.
const fn default_guardrail_ratio() -> f64 {
    DEFAULT_GUARDRAIL_RATIO
}

/// Serde default for the LTV discount.
const fn default_ltv_discount_factor() -> f64 {
    DEFAULT_LTV_DISCOUNT_FACTOR
}

/// Serde default for the CAC buffer.
const fn default_cac_risk_buffer() -> f64 {
    DEFAULT_CAC_RISK_BUFFER
}

/// Serde default for the capacity bound.
const fn default_max_capacity_utilization() -> f64 {
    DEFAULT_MAX_CAPACITY_UTILIZATION
}

// ============================================================================
// SECTION: Policy Keys
// ============================================================================

/// Reference to a policy constant from a gate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKey {
    /// [`PolicyConstants::guardrail_ratio`].
    GuardrailRatio,
    /// [`PolicyConstants::ltv_discount_factor`].
    LtvDiscountFactor,
    /// [`PolicyConstants::cac_risk_buffer`].
    CacRiskBuffer,
    /// [`PolicyConstants::max_capacity_utilization`].
    MaxCapacityUtilization,
}

// ============================================================================
// SECTION: Definitions Status
// ============================================================================

/// Whether the LTV/CAC definitions are authoritative (Gate 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionsStatus {
    /// Definitions are established and reviewed.
    #[default]
    Current,
    /// Definitions are missing, incomplete, or stale.
    Outdated,
}

impl DefinitionsStatus {
    /// Returns true when Gate 0 is open.
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(self, Self::Current)
    }
}
