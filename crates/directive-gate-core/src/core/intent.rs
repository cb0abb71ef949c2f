// crates/directive-gate-core/src/core/intent.rs
// ============================================================================
// Module: Directive Gate Intent Classification
// Description: Pre-classified decision types, pain signals, and time horizons.
// Purpose: Provide the closed enums a routing request is expressed in.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Intent arrives already classified. These enums are closed sets; the wire
//! form is snake case and the display form is the label shown to operators.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Decision Type
// ============================================================================

/// What the operator is deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// Price points, discounts, upsells.
    Pricing,
    /// Ads, leads, traffic, referrals.
    Acquisition,
    /// What to sell.
    ProductOffer,
    /// Shop throughput and scheduling.
    CapacityOperations,
    /// Customer fit and friction.
    CustomerQuality,
    /// Hiring, expansion, volume.
    ScalingGrowth,
    /// Profit and cash flow.
    FinancialViability,
    /// Focus and positioning.
    StrategicDirection,
}

impl DecisionType {
    /// All decision types in clarifying-question order.
    pub const ALL: [Self; 8] = [
        Self::Pricing,
        Self::Acquisition,
        Self::ProductOffer,
        Self::CapacityOperations,
        Self::CustomerQuality,
        Self::ScalingGrowth,
        Self::FinancialViability,
        Self::StrategicDirection,
    ];

    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pricing => "Pricing",
            Self::Acquisition => "Acquisition",
            Self::ProductOffer => "Product / Offer",
            Self::CapacityOperations => "Capacity / Operations",
            Self::CustomerQuality => "Customer Quality",
            Self::ScalingGrowth => "Scaling / Growth",
            Self::FinancialViability => "Financial Viability",
            Self::StrategicDirection => "Strategic Direction",
        }
    }

    /// Option text used in the clarifying question.
    #[must_use]
    pub const fn option_label(self) -> &'static str {
        match self {
            Self::Pricing => "Pricing",
            Self::Acquisition => "Acquisition (ads/leads/traffic)",
            Self::ProductOffer => "Product/Offer (what to sell)",
            Self::CapacityOperations => "Capacity/Operations (shop throughput)",
            Self::CustomerQuality => "Customer Quality",
            Self::ScalingGrowth => "Scaling/Growth",
            Self::FinancialViability => "Financial Viability (profit/cashflow)",
            Self::StrategicDirection => "Strategic Direction",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Pain Signal
// ============================================================================

/// What currently feels broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainSignal {
    /// Sales are slow.
    SalesSlow,
    /// Margins feel thin.
    MarginsThin,
    /// The operator is overloaded.
    Overloaded,
    /// Customers are difficult.
    CustomersDifficult,
    /// Growth feels risky.
    GrowthRisky,
    /// Not sure what to do next.
    UnsureNextStep,
}

impl PainSignal {
    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SalesSlow => "Sales are slow",
            Self::MarginsThin => "Margins feel thin",
            Self::Overloaded => "I'm overloaded",
            Self::CustomersDifficult => "Customers are difficult",
            Self::GrowthRisky => "Growth feels risky",
            Self::UnsureNextStep => "Not sure what to do next",
        }
    }
}

impl fmt::Display for PainSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Time Horizon
// ============================================================================

/// How soon the decision has to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    /// Days.
    Immediate,
    /// Weeks.
    #[default]
    Short,
    /// Months.
    Medium,
}

impl TimeHorizon {
    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate (days)",
            Self::Short => "Short (weeks)",
            Self::Medium => "Medium (months)",
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
