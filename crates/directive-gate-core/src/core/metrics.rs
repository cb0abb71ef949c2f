// crates/directive-gate-core/src/core/metrics.rs
// ============================================================================
// Module: Directive Gate Metric Types
// Description: Inputs and results for contribution, LTV, CAC, and guardrail formulas.
// Purpose: Provide serializable, per-call values for the formula engine.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Metric values are plain per-call records. Inputs are never mutated by the
//! formula engine; results are fresh values that record the policy constant
//! applied so a reader can re-derive them.
//!
//! All monetary amounts are `f64` in the operator's currency and must be
//! finite and non-negative on input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Order Economics
// ============================================================================

/// Per-order monetary inputs.
///
/// # Invariants
/// - Every amount is finite and non-negative (checked by the formula engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricInputs {
    /// Selling price of one order.
    pub price: f64,
    /// Materials and goods cost.
    pub cogs: f64,
    /// Time-valued labor (and shop overhead) per order.
    pub variable_labor: f64,
    /// Packaging cost.
    pub packaging: f64,
    /// Outbound shipping cost.
    pub shipping: f64,
    /// Payment processing fees.
    pub fees: f64,
    /// Tolerated shortfall before a negative contribution is rejected.
    pub refund_allowance: f64,
}

impl MetricInputs {
    /// Field names read from a routing request, in declaration order.
    pub const FIELDS: [&'static str; 7] = [
        "price",
        "cogs",
        "variable_labor",
        "packaging",
        "shipping",
        "fees",
        "refund_allowance",
    ];

    /// Sum of all per-order costs (allowance excluded).
    #[must_use]
    pub fn total_costs(&self) -> f64 {
        self.cogs + self.variable_labor + self.packaging + self.shipping + self.fees
    }
}

/// Advisory raised alongside a contribution that is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionWarning {
    /// Contribution is negative but within the refund allowance.
    NegativeWithinAllowance,
    /// Labor was recorded as zero; founder time is never free.
    ZeroLabor,
}

impl ContributionWarning {
    /// Operator-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NegativeWithinAllowance => {
                "Contribution is negative (within the refund allowance). Fix pricing or costs."
            }
            Self::ZeroLabor => "Labor is 0. Enter realistic total labor time per unit.",
        }
    }
}

/// Per-order contribution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderContribution {
    /// `price - (cogs + variable_labor + packaging + shipping + fees)`.
    pub contribution: f64,
    /// Contribution divided by price; absent when price is zero.
    pub margin: Option<f64>,
    /// Non-fatal advisories.
    pub warnings: Vec<ContributionWarning>,
}

// ============================================================================
// SECTION: Order Profile
// ============================================================================

/// Shop-level description of one order, expanded into [`MetricInputs`].
///
/// # Invariants
/// - `fee_rate` lies in `[0, 1]`; every other amount is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderProfile {
    /// Selling price (average order value).
    pub price: f64,
    /// Materials and goods cost.
    pub cogs: f64,
    /// Packaging cost.
    pub packaging: f64,
    /// Outbound shipping cost.
    pub shipping: f64,
    /// Percentage payment fee (for example 0.029).
    pub fee_rate: f64,
    /// Fixed payment fee per order.
    pub fee_fixed: f64,
    /// Labor minutes per order.
    pub labor_minutes: f64,
    /// Fully loaded labor rate per hour.
    pub labor_rate: f64,
    /// Shop overhead allocation per labor hour.
    #[serde(default)]
    pub overhead_rate: f64,
    /// Tolerated refund shortfall.
    #[serde(default)]
    pub refund_allowance: f64,
}

/// Cost breakdown derived from an [`OrderProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBreakdown {
    /// `price * fee_rate + fee_fixed`.
    pub payment_fees: f64,
    /// `labor_minutes / 60 * labor_rate`.
    pub labor_cost: f64,
    /// `labor_minutes / 60 * overhead_rate`.
    pub overhead_cost: f64,
    /// Expanded inputs (`variable_labor = labor_cost + overhead_cost`).
    pub inputs: MetricInputs,
    /// Contribution of the expanded inputs.
    pub contribution: OrderContribution,
}

// ============================================================================
// SECTION: Lifetime Value
// ============================================================================

/// One expected repeat order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepeatOrder {
    /// One-based order index.
    pub order_index: u32,
    /// Probability the order happens.
    pub probability: f64,
    /// Months after the first purchase (first order is month 0).
    pub month_offset: u32,
}

/// Ordered repeat-purchase profile for one customer.
///
/// # Invariants
/// - Index 1 first, with probability exactly 1.0; indices step by 1.
/// - Probabilities lie in `[0, 1]` and never increase.
/// - Month offsets never decrease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepeatProfile(pub Vec<RepeatOrder>);

impl RepeatProfile {
    /// Returns the orders in index order.
    #[must_use]
    pub fn orders(&self) -> &[RepeatOrder] {
        &self.0
    }
}

/// An order weighted by probability and contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedOrder {
    /// One-based order index.
    pub order_index: u32,
    /// Probability the order happens.
    pub probability: f64,
    /// Contribution of the order.
    pub contribution: f64,
    /// Months after the first purchase.
    pub month_offset: u32,
}

/// Lifetime value over a fixed horizon.
///
/// # Invariants
/// - `usable == raw * discount_factor`; `usable <= raw` whenever `raw >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvResult {
    /// Horizon in months (> 0).
    pub horizon_months: u32,
    /// Orders counted inside the horizon.
    pub orders_counted: usize,
    /// Sum of probability times contribution.
    pub raw: f64,
    /// Policy discount applied.
    pub discount_factor: f64,
    /// `raw * discount_factor`.
    pub usable: f64,
}

// ============================================================================
// SECTION: Acquisition Cost
// ============================================================================

/// Acquisition costs for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    /// Paid media spend.
    pub paid: f64,
    /// Owned/earned channel costs allocated to the period.
    pub allocated: f64,
    /// Labor-valued acquisition time; must be > 0.
    pub labor: f64,
}

impl AcquisitionCosts {
    /// Total fully loaded acquisition cost.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.paid + self.allocated + self.labor
    }
}

/// Acquisition subset for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpend {
    /// Channel cost.
    pub cost: f64,
    /// Customers attributed to the channel.
    pub new_customers: u32,
}

/// Inputs for blended and per-channel CAC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacInputs {
    /// Period costs.
    pub costs: AcquisitionCosts,
    /// New customers in the period.
    pub new_customers: u32,
    /// Optional channel subsets; may overlap.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelSpend>,
}

/// Customer acquisition cost.
///
/// # Invariants
/// - `usable == blended * risk_buffer`; `usable >= blended`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacResult {
    /// Fully loaded cost for the period.
    pub total_cost: f64,
    /// `total_cost / new_customers`.
    pub blended: f64,
    /// Channel to CAC; need not sum to `blended`.
    pub channels: BTreeMap<String, f64>,
    /// Policy buffer applied.
    pub risk_buffer: f64,
    /// `blended * risk_buffer`.
    pub usable: f64,
}

// ============================================================================
// SECTION: Guardrail
// ============================================================================

/// Usable LTV over usable CAC compared against the policy threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailRatio {
    /// Usable LTV ÷ usable CAC.
    pub ratio: f64,
    /// Policy threshold (inclusive).
    pub threshold: f64,
    /// `ratio >= threshold`.
    pub passes: bool,
    /// Largest CAC that would still meet the threshold: usable LTV ÷ threshold.
    pub max_allowable_cac: f64,
}
