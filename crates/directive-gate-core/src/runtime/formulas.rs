// crates/directive-gate-core/src/runtime/formulas.rs
// ============================================================================
// Module: Directive Gate Metric Formulas
// Description: Contribution, LTV, CAC, and guardrail formulas.
// Purpose: Compute customer economics deterministically from validated inputs.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`MetricFormulaEngine`] is pure: no I/O, no shared state beyond read-only
//! policy constants, and no defaulting. Every input is validated before use
//! and every failure names the field responsible.
//!
//! Formulas:
//! - contribution = price − (cogs + variable labor + packaging + shipping + fees)
//! - raw LTV = Σ probability × contribution for orders inside the horizon
//! - usable LTV = raw LTV × discount factor
//! - blended CAC = total acquisition cost ÷ new customers
//! - usable CAC = blended CAC × risk buffer
//! - guardrail ratio = usable LTV ÷ usable CAC

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::AcquisitionCosts;
use crate::core::CacInputs;
use crate::core::CacResult;
use crate::core::ContributionWarning;
use crate::core::DecisionError;
use crate::core::ExpectedOrder;
use crate::core::GuardrailRatio;
use crate::core::LtvResult;
use crate::core::MetricInputs;
use crate::core::OrderBreakdown;
use crate::core::OrderContribution;
use crate::core::OrderProfile;
use crate::core::PolicyConstants;
use crate::core::RepeatProfile;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field name used for repeat-profile validation errors.
const REPEAT_PROFILE_FIELD: &str = "repeat_profile";
/// Field name used for horizon validation errors.
const HORIZON_FIELD: &str = "horizon_months";
/// Minutes per hour for labor valuation.
const MINUTES_PER_HOUR: f64 = 60.0;

// ============================================================================
// SECTION: Formula Engine
// ============================================================================

/// Pure formula engine bound to a set of policy constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricFormulaEngine {
    /// Policy constants applied by every formula.
    policy: PolicyConstants,
}

impl MetricFormulaEngine {
    /// Creates an engine for the given policy.
    #[must_use]
    pub const fn new(policy: PolicyConstants) -> Self {
        Self {
            policy,
        }
    }

    /// Returns the policy constants in use.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConstants {
        &self.policy
    }

    /// Computes per-order contribution.
    ///
    /// A negative contribution within `refund_allowance` is returned with a
    /// warning; a larger shortfall is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] for non-finite or negative
    /// inputs, or naming `price` when costs exceed price by more than the
    /// refund allowance.
    pub fn compute_order_contribution(
        &self,
        inputs: &MetricInputs,
    ) -> Result<OrderContribution, DecisionError> {
        let values = [
            inputs.price,
            inputs.cogs,
            inputs.variable_labor,
            inputs.packaging,
            inputs.shipping,
            inputs.fees,
            inputs.refund_allowance,
        ];
        for (field, value) in MetricInputs::FIELDS.iter().zip(values) {
            ensure_amount(field, value)?;
        }

        let contribution = inputs.price - inputs.total_costs();
        let mut warnings = Vec::new();
        if contribution < 0.0 {
            let shortfall = -contribution;
            if shortfall > inputs.refund_allowance {
                return Err(DecisionError::invalid(
                    "price",
                    format!(
                        "costs exceed price by {shortfall}, beyond the refund allowance of {}",
                        inputs.refund_allowance
                    ),
                ));
            }
            warnings.push(ContributionWarning::NegativeWithinAllowance);
        }
        if inputs.variable_labor == 0.0 {
            warnings.push(ContributionWarning::ZeroLabor);
        }
        let margin = (inputs.price > 0.0).then(|| contribution / inputs.price);
        Ok(OrderContribution {
            contribution,
            margin,
            warnings,
        })
    }

    /// Expands a shop-level order profile into metric inputs and contribution.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when an amount is negative or
    /// non-finite, when `fee_rate` is outside `[0, 1]`, or when the expanded
    /// contribution is rejected.
    pub fn compute_order_profile(
        &self,
        profile: &OrderProfile,
    ) -> Result<OrderBreakdown, DecisionError> {
        for (field, value) in [
            ("price", profile.price),
            ("cogs", profile.cogs),
            ("packaging", profile.packaging),
            ("shipping", profile.shipping),
            ("fee_fixed", profile.fee_fixed),
            ("labor_minutes", profile.labor_minutes),
            ("labor_rate", profile.labor_rate),
            ("overhead_rate", profile.overhead_rate),
            ("refund_allowance", profile.refund_allowance),
        ] {
            ensure_amount(field, value)?;
        }
        ensure_unit_interval("fee_rate", profile.fee_rate)?;

        let payment_fees = profile.price * profile.fee_rate + profile.fee_fixed;
        let labor_cost = profile.labor_minutes / MINUTES_PER_HOUR * profile.labor_rate;
        let overhead_cost = profile.labor_minutes / MINUTES_PER_HOUR * profile.overhead_rate;
        let inputs = MetricInputs {
            price: profile.price,
            cogs: profile.cogs,
            variable_labor: labor_cost + overhead_cost,
            packaging: profile.packaging,
            shipping: profile.shipping,
            fees: payment_fees,
            refund_allowance: profile.refund_allowance,
        };
        let contribution = self.compute_order_contribution(&inputs)?;
        Ok(OrderBreakdown {
            payment_fees,
            labor_cost,
            overhead_cost,
            inputs,
            contribution,
        })
    }

    /// Weights a repeat profile by a per-order contribution.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] naming `repeat_profile` when the
    /// profile violates its ordering or probability invariants.
    pub fn expected_orders(
        &self,
        profile: &RepeatProfile,
        contribution: f64,
    ) -> Result<Vec<ExpectedOrder>, DecisionError> {
        let orders: Vec<ExpectedOrder> = profile
            .orders()
            .iter()
            .map(|order| ExpectedOrder {
                order_index: order.order_index,
                probability: order.probability,
                contribution,
                month_offset: order.month_offset,
            })
            .collect();
        validate_orders(&orders)?;
        Ok(orders)
    }

    /// Computes expected LTV over a horizon.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidInput`] when the horizon is not
    /// positive, a probability is outside `[0, 1]`, probabilities increase,
    /// or the first order's probability is not exactly 1.0.
    pub fn compute_expected_ltv(
        &self,
        orders: &[ExpectedOrder],
        horizon_months: i64,
    ) -> Result<LtvResult, DecisionError> {
        if horizon_months <= 0 {
            return Err(DecisionError::invalid(HORIZON_FIELD, "must be > 0"));
        }
        let horizon = u32::try_from(horizon_months)
            .map_err(|_| DecisionError::invalid(HORIZON_FIELD, "exceeds the supported range"))?;
        validate_orders(orders)?;

        let mut raw = 0.0;
        let mut orders_counted = 0;
        for order in orders.iter().filter(|order| order.month_offset < horizon) {
            raw += order.probability * order.contribution;
            orders_counted += 1;
        }
        let discount_factor = self.policy.ltv_discount_factor;
        Ok(LtvResult {
            horizon_months: horizon,
            orders_counted,
            raw,
            discount_factor,
            usable: raw * discount_factor,
        })
    }

    /// Computes blended, per-channel, and usable CAC.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::DivisionByZero`] when `new_customers` (or a
    /// channel's customer count) is zero, and [`DecisionError::InvalidInput`]
    /// for negative or non-finite costs or zero acquisition labor.
    pub fn compute_cac(&self, inputs: &CacInputs) -> Result<CacResult, DecisionError> {
        validate_costs(&inputs.costs)?;
        if inputs.new_customers == 0 {
            return Err(DecisionError::division_by_zero("new_customers"));
        }
        let total_cost = inputs.costs.total();
        let blended = total_cost / f64::from(inputs.new_customers);

        let mut channels = BTreeMap::new();
        for (name, spend) in &inputs.channels {
            ensure_amount(&format!("acquisition_channels.{name}.cost"), spend.cost)?;
            if spend.new_customers == 0 {
                return Err(DecisionError::division_by_zero(format!(
                    "acquisition_channels.{name}.new_customers"
                )));
            }
            channels.insert(name.clone(), spend.cost / f64::from(spend.new_customers));
        }

        let risk_buffer = self.policy.cac_risk_buffer;
        Ok(CacResult {
            total_cost,
            blended,
            channels,
            risk_buffer,
            usable: blended * risk_buffer,
        })
    }

    /// Computes the guardrail ratio from LTV and CAC results.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::DivisionByZero`] when usable CAC is zero.
    pub fn compute_guardrail_ratio(
        &self,
        ltv: &LtvResult,
        cac: &CacResult,
    ) -> Result<GuardrailRatio, DecisionError> {
        self.guardrail_from_usable(ltv.usable, cac.usable)
    }

    /// Computes the guardrail ratio from usable LTV and usable CAC values.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::DivisionByZero`] when `usable_cac` is zero and
    /// [`DecisionError::InvalidInput`] for non-finite or negative CAC.
    pub fn guardrail_from_usable(
        &self,
        usable_ltv: f64,
        usable_cac: f64,
    ) -> Result<GuardrailRatio, DecisionError> {
        if !usable_ltv.is_finite() {
            return Err(DecisionError::invalid("usable_ltv", "must be finite"));
        }
        ensure_amount("usable_cac", usable_cac)?;
        if usable_cac == 0.0 {
            return Err(DecisionError::division_by_zero("usable_cac"));
        }
        let threshold = self.policy.guardrail_ratio;
        let ratio = usable_ltv / usable_cac;
        let max_allowable_cac = if usable_ltv > 0.0 { usable_ltv / threshold } else { 0.0 };
        Ok(GuardrailRatio {
            ratio,
            threshold,
            passes: ratio >= threshold,
            max_allowable_cac,
        })
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rejects negative or non-finite monetary amounts.
fn ensure_amount(field: &str, value: f64) -> Result<(), DecisionError> {
    if !value.is_finite() {
        return Err(DecisionError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(DecisionError::invalid(field, "must be >= 0"));
    }
    Ok(())
}

/// Rejects values outside `[0, 1]`.
fn ensure_unit_interval(field: &str, value: f64) -> Result<(), DecisionError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(DecisionError::invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

/// Validates acquisition cost components.
fn validate_costs(costs: &AcquisitionCosts) -> Result<(), DecisionError> {
    ensure_amount("paid_acquisition_cost", costs.paid)?;
    ensure_amount("allocated_acquisition_cost", costs.allocated)?;
    ensure_amount("acquisition_labor_cost", costs.labor)?;
    if costs.labor == 0.0 {
        return Err(DecisionError::invalid(
            "acquisition_labor_cost",
            "must be > 0; acquisition labor is never recorded as zero",
        ));
    }
    Ok(())
}

/// Validates repeat-order ordering and probability invariants.
fn validate_orders(orders: &[ExpectedOrder]) -> Result<(), DecisionError> {
    let Some(first) = orders.first() else {
        return Err(DecisionError::invalid(REPEAT_PROFILE_FIELD, "must list at least one order"));
    };
    if first.order_index != 1 {
        return Err(DecisionError::invalid(REPEAT_PROFILE_FIELD, "first order_index must be 1"));
    }
    if first.probability != 1.0 {
        return Err(DecisionError::invalid(
            REPEAT_PROFILE_FIELD,
            "first order probability must be exactly 1.0",
        ));
    }
    if first.month_offset != 0 {
        return Err(DecisionError::invalid(
            REPEAT_PROFILE_FIELD,
            "first order month_offset must be 0",
        ));
    }
    let mut previous: Option<&ExpectedOrder> = None;
    for order in orders {
        if !order.probability.is_finite() || !(0.0..=1.0).contains(&order.probability) {
            return Err(DecisionError::invalid(
                REPEAT_PROFILE_FIELD,
                format!("probability for order {} must be in [0, 1]", order.order_index),
            ));
        }
        if !order.contribution.is_finite() {
            return Err(DecisionError::invalid(
                REPEAT_PROFILE_FIELD,
                format!("contribution for order {} must be finite", order.order_index),
            ));
        }
        if let Some(previous) = previous {
            if order.order_index != previous.order_index.saturating_add(1) {
                return Err(DecisionError::invalid(
                    REPEAT_PROFILE_FIELD,
                    format!("order_index {} does not follow {}", order.order_index, previous.order_index),
                ));
            }
            if order.month_offset < previous.month_offset {
                return Err(DecisionError::invalid(
                    REPEAT_PROFILE_FIELD,
                    format!(
                        "month_offset for order {} precedes order {}",
                        order.order_index, previous.order_index
                    ),
                ));
            }
            if order.probability > previous.probability {
                return Err(DecisionError::invalid(
                    REPEAT_PROFILE_FIELD,
                    format!(
                        "probability for order {} exceeds order {}",
                        order.order_index, previous.order_index
                    ),
                ));
            }
        }
        previous = Some(order);
    }
    Ok(())
}
