// crates/directive-gate-core/src/core/catalog.rs
// ============================================================================
// Module: Directive Gate Built-In Catalog
// Description: Default directives, gates, and scenario groups.
// Purpose: Ship the stabilize-before-optimize policy table as data.
// Dependencies: crate::core::{directive, identifiers, intent, metrics, policy}, serde_json
// ============================================================================

//! ## Overview
//! The built-in catalog encodes the conservative routing policy: LTV and CAC
//! definitions first, then unit economics, capacity, customer quality,
//! pricing, product mix, acquisition, scalability, and finally the scaling
//! strategy escalation. Operators may replace it through configuration; the
//! replacement goes through the same validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::core::directive::CatalogError;
use crate::core::directive::Comparator;
use crate::core::directive::ConditionSpec;
use crate::core::directive::DirectiveCatalog;
use crate::core::directive::DirectiveKind;
use crate::core::directive::DirectiveSpec;
use crate::core::directive::ExpectedValue;
use crate::core::directive::FIELD_BOTTLENECKED_RESOURCES;
use crate::core::directive::FIELD_GUARDRAIL_RATIO;
use crate::core::directive::FIELD_ORDER_CONTRIBUTION;
use crate::core::directive::FIELD_PEAK_UTILIZATION;
use crate::core::directive::FIELD_USABLE_CAC;
use crate::core::directive::FIELD_USABLE_LTV;
use crate::core::directive::MetricStep;
use crate::core::directive::ScenarioSpec;
use crate::core::identifiers::DirectiveId;
use crate::core::identifiers::GateNumber;
use crate::core::identifiers::ScenarioId;
use crate::core::intent::DecisionType;
use crate::core::intent::PainSignal;
use crate::core::policy::PolicyKey;

// ============================================================================
// SECTION: Directive Identifiers
// ============================================================================

/// LTV model definition (Gate 0).
pub const DEFINE_LTV_MODEL: &str = "define_ltv_model";
/// CAC model definition (Gate 0).
pub const DEFINE_CAC_MODEL: &str = "define_cac_model";
/// Unit economics (Gate 1).
pub const DIAGNOSE_UNIT_ECONOMICS: &str = "diagnose_unit_economics";
/// Capacity and throughput (Gate 2).
pub const DIAGNOSE_CAPACITY: &str = "diagnose_capacity_and_throughput";
/// Customer quality (Gate 3).
pub const DIAGNOSE_CUSTOMER_QUALITY: &str = "diagnose_customer_quality";
/// Pricing (Gate 4).
pub const DIAGNOSE_PRICING: &str = "diagnose_pricing";
/// Product mix (Gate 6).
pub const OPTIMIZE_PRODUCT_MIX: &str = "optimize_product_mix";
/// Acquisition quality (Gate 5).
pub const DIAGNOSE_ACQUISITION_QUALITY: &str = "diagnose_acquisition_quality";
/// Scalability (Gate 7).
pub const DIAGNOSE_SCALABILITY: &str = "diagnose_scalability";
/// Scaling strategy escalation target.
pub const OPTIMIZE_SCALING_STRATEGY: &str = "optimize_scaling_strategy";

// ============================================================================
// SECTION: Catalog Construction
// ============================================================================

/// Builds and validates the built-in catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] if the built-in table violates catalog invariants.
pub fn builtin_catalog() -> Result<DirectiveCatalog, CatalogError> {
    DirectiveCatalog::new(builtin_directives(), builtin_scenarios())
}

/// Returns the built-in directives in declared (tie-break) order.
#[must_use]
pub fn builtin_directives() -> Vec<DirectiveSpec> {
    vec![
        DirectiveSpec {
            triggers: strings(&["ltv", "lifetime value", "repeat rate"]),
            metric: Some(MetricStep::Ltv),
            required_inputs: strings(MetricStep::Ltv.request_fields()),
            conditions: vec![exists(FIELD_USABLE_LTV)],
            stop_recommendation: "Define a usable LTV before any other decision.".to_string(),
            do_not: strings(&[
                "Do not change pricing, marketing, or product mix until LTV/CAC are defined.",
            ]),
            ..gate(DEFINE_LTV_MODEL, "Define LTV model", 0, &[])
        },
        DirectiveSpec {
            triggers: strings(&["cac", "acquisition cost", "cost per customer"]),
            metric: Some(MetricStep::Cac),
            required_inputs: strings(MetricStep::Cac.request_fields()),
            optional_inputs: strings(&["acquisition_channels"]),
            conditions: vec![exists(FIELD_USABLE_CAC)],
            stop_recommendation: "Define a fully loaded CAC before any other decision."
                .to_string(),
            do_not: strings(&[
                "Do not record acquisition labor as zero; founder time is a cost.",
            ]),
            ..gate(DEFINE_CAC_MODEL, "Define CAC model", 0, &[DEFINE_LTV_MODEL])
        },
        DirectiveSpec {
            triggers: strings(&["unit economics", "contribution", "break even"]),
            metric: Some(MetricStep::OrderContribution),
            required_inputs: strings(MetricStep::OrderContribution.request_fields()),
            conditions: vec![condition(
                FIELD_ORDER_CONTRIBUTION,
                Comparator::GreaterThan,
                ExpectedValue::Literal(json!(0)),
            )],
            stop_recommendation: "Fix unit economics before anything else: each order loses money."
                .to_string(),
            do_not: strings(&[
                "If unit economics FAIL, do not scale acquisition or add complexity.",
            ]),
            ..gate(DIAGNOSE_UNIT_ECONOMICS, "Diagnose unit economics", 1, &[DEFINE_LTV_MODEL])
        },
        DirectiveSpec {
            triggers: strings(&["capacity", "throughput", "bottleneck", "lead time"]),
            metric: Some(MetricStep::Capacity),
            required_inputs: strings(&["capacity_report"]),
            conditions: vec![condition(
                FIELD_PEAK_UTILIZATION,
                Comparator::LessThan,
                ExpectedValue::Policy(PolicyKey::MaxCapacityUtilization),
            )],
            stop_recommendation: "Relieve the bottleneck before adding demand.".to_string(),
            do_not: strings(&["If a single bottleneck dominates, optimize that before adding demand."]),
            ..gate(DIAGNOSE_CAPACITY, "Diagnose capacity and throughput", 2, &[])
        },
        DirectiveSpec {
            triggers: strings(&["customer quality", "difficult customers", "friction"]),
            required_inputs: strings(&["customer_friction"]),
            conditions: vec![condition(
                "customer_friction",
                Comparator::InSet,
                ExpectedValue::Literal(json!(["low", "moderate"])),
            )],
            stop_recommendation: "Tighten offer boundaries before pricing or acquisition changes."
                .to_string(),
            do_not: strings(&[
                "If majority is misaligned/high-friction, tighten offer boundaries before scaling.",
            ]),
            ..gate(DIAGNOSE_CUSTOMER_QUALITY, "Diagnose customer quality", 3, &[])
        },
        DirectiveSpec {
            triggers: strings(&["pricing", "price change"]),
            required_inputs: strings(&["pricing_fit"]),
            conditions: vec![condition(
                "pricing_fit",
                Comparator::InSet,
                ExpectedValue::Literal(json!(["aligned", "underpriced"])),
            )],
            stop_recommendation: "Realign price to value before changing volume.".to_string(),
            do_not: strings(&["Do not discount by default; fix fit and sales motion first."]),
            ..gate(
                DIAGNOSE_PRICING,
                "Diagnose pricing",
                4,
                &[
                    DEFINE_LTV_MODEL,
                    DEFINE_CAC_MODEL,
                    DIAGNOSE_CAPACITY,
                    DIAGNOSE_CUSTOMER_QUALITY,
                ],
            )
        },
        DirectiveSpec {
            triggers: strings(&["product mix", "sku", "bundle"]),
            required_inputs: strings(&["offers_hit_bottleneck"]),
            conditions: vec![condition(
                "offers_hit_bottleneck",
                Comparator::Equals,
                ExpectedValue::Literal(Value::Bool(false)),
            )],
            stop_recommendation: "Constrain offers that load the bottleneck step.".to_string(),
            do_not: strings(&[
                "If the bottleneck step is overloaded, do not add offers that hit it harder.",
            ]),
            ..gate(OPTIMIZE_PRODUCT_MIX, "Optimize product mix", 6, &[DIAGNOSE_CAPACITY])
        },
        DirectiveSpec {
            triggers: strings(&["acquisition quality", "lead quality", "ad spend"]),
            metric: Some(MetricStep::Guardrail),
            conditions: vec![condition(
                FIELD_GUARDRAIL_RATIO,
                Comparator::GreaterThanOrEqual,
                ExpectedValue::Policy(PolicyKey::GuardrailRatio),
            )],
            stop_recommendation: "Do not scale spend: usable LTV:CAC is below the guardrail."
                .to_string(),
            do_not: strings(&["Do not scale spend unless CAC ≤ LTV / 12 (12:1+ LTV:CAC)."]),
            ..gate(
                DIAGNOSE_ACQUISITION_QUALITY,
                "Diagnose acquisition quality",
                5,
                &[
                    DEFINE_LTV_MODEL,
                    DEFINE_CAC_MODEL,
                    DIAGNOSE_UNIT_ECONOMICS,
                    DIAGNOSE_CAPACITY,
                    DIAGNOSE_CUSTOMER_QUALITY,
                ],
            )
        },
        DirectiveSpec {
            triggers: strings(&["scalability", "do not scale"]),
            metric: Some(MetricStep::Capacity),
            required_inputs: strings(&["capacity_report"]),
            conditions: vec![condition(
                FIELD_BOTTLENECKED_RESOURCES,
                Comparator::DeepEquals,
                ExpectedValue::Literal(json!([])),
            )],
            stop_recommendation: "Do Not Scale: stabilize bottlenecked resources first."
                .to_string(),
            do_not: strings(&[
                "If diagnose_scalability returns Do Not Scale, stop scaling actions and stabilize first.",
            ]),
            ..gate(
                DIAGNOSE_SCALABILITY,
                "Diagnose scalability",
                7,
                &[DIAGNOSE_UNIT_ECONOMICS, DIAGNOSE_CAPACITY],
            )
        },
        DirectiveSpec {
            id: DirectiveId::new(OPTIMIZE_SCALING_STRATEGY),
            title: "Optimize scaling strategy".to_string(),
            gate: None,
            kind: DirectiveKind::Escalation,
            prerequisites: ids(&[DIAGNOSE_SCALABILITY]),
            required_inputs: Vec::new(),
            optional_inputs: Vec::new(),
            triggers: strings(&["scaling strategy"]),
            metric: None,
            conditions: Vec::new(),
            stop_recommendation: String::new(),
            do_not: Vec::new(),
        },
    ]
}

/// Returns the built-in scenario groups (pain signals first, then decision types).
#[must_use]
pub fn builtin_scenarios() -> Vec<ScenarioSpec> {
    vec![
        pain_group(
            "sales_slow",
            PainSignal::SalesSlow,
            &[DIAGNOSE_CUSTOMER_QUALITY, DIAGNOSE_PRICING, DIAGNOSE_ACQUISITION_QUALITY],
            &[
                "sales are slow",
                "not selling",
                "no sales",
                "slow sales",
                "demand is low",
                "not enough orders",
            ],
            "Sales slowness can be caused by wrong customers, wrong price/value match, or weak \
             acquisition quality. This sequence prevents discounting or ad-spend mistakes.",
            &[
                "Last 10–30 quotes/orders (or best available)",
                "Your current prices + what customers actually ask for",
                "Where leads are coming from (even if small sample)",
                "Any close-rate or inquiry-to-order notes you have",
            ],
            &[
                "Do not discount or increase ad spend until customer quality + pricing are \
                 diagnosed.",
                "If acquisition quality shows poor-fit leads, fix targeting before scaling.",
            ],
        ),
        pain_group(
            "margins_thin",
            PainSignal::MarginsThin,
            &[
                DIAGNOSE_UNIT_ECONOMICS,
                DIAGNOSE_CUSTOMER_QUALITY,
                DIAGNOSE_PRICING,
                OPTIMIZE_PRODUCT_MIX,
            ],
            &[
                "thin margins",
                "margins are thin",
                "not enough profit",
                "profit is low",
                "gross margin",
            ],
            "Thin margins require verifying unit economics first, then checking if customer \
             behavior and pricing are the driver, then correcting product mix to protect \
             throughput and profit.",
            &[
                "A sample order: selling price + materials + labor time + packaging + shipping",
                "Any rework/revision rates",
                "Custom requests frequency",
                "Which products feel most profitable vs most painful",
            ],
            &[
                "Do not chase volume until unit economics are understood and corrected.",
                "If customer quality is misaligned, fix offer boundaries before pricing changes.",
            ],
        ),
        pain_group(
            "overloaded",
            PainSignal::Overloaded,
            &[DIAGNOSE_CAPACITY, OPTIMIZE_PRODUCT_MIX, DIAGNOSE_PRICING],
            &["overwhelmed", "too busy", "behind", "late", "can't keep up", "overloaded", "burnout"],
            "Overload is usually a bottleneck problem (not a motivation problem). Capacity must \
             be clarified first, then product mix, then pricing to throttle demand.",
            &[
                "Your production steps (design → cut → finish → assemble → pack → ship)",
                "Typical labor minutes per product type",
                "Current backlog + lead times",
                "Which step is consistently the bottleneck",
            ],
            &[
                "Do not add SKUs or run promotions while overloaded.",
                "If bottleneck is founder time, constrain offers until relieved.",
            ],
        ),
        pain_group(
            "customers_difficult",
            PainSignal::CustomersDifficult,
            &[DIAGNOSE_CUSTOMER_QUALITY, OPTIMIZE_PRODUCT_MIX, DIAGNOSE_PRICING],
            &["difficult customers", "refund", "chargeback", "complaint", "scope creep", "revisions"],
            "Customer friction is usually caused by boundaries (offer design), mismatch, or \
             pricing that invites the wrong buyer. Fix classification first, then mix, then \
             price.",
            &[
                "Examples of difficult interactions (what triggered friction)",
                "Revision count by order type",
                "Refund/discount history (if any)",
                "Current promise/expectations customers buy under",
            ],
            &[
                "Do not accept more customization until customer segmentation is clarified.",
                "If revisions dominate, tighten spec + boundaries before scaling acquisition.",
            ],
        ),
        pain_group(
            "growth_risky",
            PainSignal::GrowthRisky,
            &[
                DIAGNOSE_UNIT_ECONOMICS,
                DIAGNOSE_CAPACITY,
                DIAGNOSE_SCALABILITY,
                OPTIMIZE_SCALING_STRATEGY,
            ],
            &["risky", "afraid to scale", "scaling worries", "can't hire", "cash risk", "too fast"],
            "If growth feels risky, you need proof that the model survives scale. Economics + \
             capacity + scalability gates prevent expensive mistakes.",
            &[
                "Unit economics per offer",
                "Capacity constraints and bottlenecks",
                "Which scaling path you're considering (ads, wholesale, hiring, etc.)",
            ],
            &[
                "If diagnose_scalability returns Do Not Scale, stop scaling actions and \
                 stabilize first.",
            ],
        ),
        decision_group(
            "financial_viability",
            DecisionType::FinancialViability,
            &[DIAGNOSE_UNIT_ECONOMICS],
            &[
                "profit",
                "loss",
                "cash",
                "cashflow",
                "payback",
                "ltv",
                "cogs",
                "gross margin",
                "net margin",
                "break even",
                "unit economics",
            ],
            "You're asking a profit/cashflow viability question. Unit economics is the fastest \
             truth source.",
            &[
                "One representative product order (price + costs + labor time)",
                "Your best estimate CAC per channel (even if early)",
            ],
            &["If unit economics FAIL, do not scale acquisition or add complexity."],
        ),
        decision_group(
            "capacity_operations",
            DecisionType::CapacityOperations,
            &[DIAGNOSE_CAPACITY, OPTIMIZE_PRODUCT_MIX],
            &[
                "overwhelmed",
                "overloaded",
                "behind",
                "late",
                "lead time",
                "throughput",
                "capacity",
                "bottleneck",
                "schedule",
                "calendar",
                "production",
                "machining",
                "cnc",
                "laser",
                "finishing",
                "assembly",
                "shipping",
                "fulfillment",
            ],
            "Operations decisions must start with the bottleneck and throughput reality.",
            &[
                "Workflow steps + time per step",
                "Current backlog, lead times, and work-in-progress limits",
            ],
            &["If a single bottleneck dominates, optimize that before adding demand."],
        ),
        decision_group(
            "customer_quality",
            DecisionType::CustomerQuality,
            &[DIAGNOSE_CUSTOMER_QUALITY],
            &[
                "bad customers",
                "difficult",
                "refund",
                "chargeback",
                "complaint",
                "revision",
                "scope creep",
                "nitpicky",
                "custom creep",
                "picky",
                "problem customers",
                "returns",
            ],
            "Customer quality must be classified before pricing/acquisition changes.",
            &["Last 10–30 customer interactions or orders", "Common friction points"],
            &["If majority is misaligned/high-friction, tighten offer boundaries before scaling."],
        ),
        decision_group(
            "pricing",
            DecisionType::Pricing,
            &[DIAGNOSE_CUSTOMER_QUALITY, DIAGNOSE_CAPACITY, DIAGNOSE_PRICING],
            &[
                "price",
                "pricing",
                "raise",
                "lower",
                "discount",
                "charge",
                "margin",
                "underpriced",
                "close rate",
                "conversion rate",
                "upsell",
                "offer price",
            ],
            "Pricing changes require customer-fit clarity and capacity reality first.",
            &[
                "Current price list",
                "Any close rate (even rough) or inquiry-to-order ratio",
                "Lead time/backlog snapshot",
            ],
            &["Do not discount by default; fix fit and sales motion first."],
        ),
        decision_group(
            "product_offer",
            DecisionType::ProductOffer,
            &[DIAGNOSE_CAPACITY, OPTIMIZE_PRODUCT_MIX],
            &[
                "product",
                "sku",
                "offer",
                "bundle",
                "package",
                "variant",
                "custom",
                "personalized",
                "launch",
                "new product",
                "catalog",
                "collection",
            ],
            "Offer changes must respect bottlenecks and throughput; otherwise you manufacture \
             overload.",
            &[
                "Current SKUs/offers and rough time/cost per one",
                "Which offers you want to add/remove",
            ],
            &["If the bottleneck step is overloaded, do not add offers that hit it harder."],
        ),
        decision_group(
            "acquisition",
            DecisionType::Acquisition,
            &[DIAGNOSE_ACQUISITION_QUALITY],
            &[
                "ads",
                "advertising",
                "facebook",
                "meta",
                "instagram",
                "google",
                "seo",
                "leads",
                "cac",
                "traffic",
                "funnel",
                "email list",
                "outreach",
                "partnership",
                "referral",
                "affiliate",
                "inbound",
                "conversion",
                "bookings",
            ],
            "Acquisition decisions must verify lead quality and CAC discipline before scaling \
             spend.",
            &[
                "Planned channels (organic, paid, referrals)",
                "Budget constraints (even rough)",
                "Target customer description",
            ],
            &["Do not scale spend unless CAC ≤ LTV / 12 (12:1+ LTV:CAC)."],
        ),
        decision_group(
            "scaling_growth",
            DecisionType::ScalingGrowth,
            &[DIAGNOSE_SCALABILITY, OPTIMIZE_SCALING_STRATEGY],
            &[
                "scale",
                "scaling",
                "hire",
                "hiring",
                "expand",
                "growth",
                "second location",
                "add capacity",
                "automation",
                "systemize",
                "delegat",
                "replicate",
                "volume",
            ],
            "Growth decisions require scalability diagnosis before choosing a scaling strategy.",
            &[
                "Your intended growth path (ads, wholesale, hiring, licensing, etc.)",
                "Unit economics snapshot",
                "Capacity bottleneck snapshot",
            ],
            &["If diagnose_scalability returns Do Not Scale, stop and stabilize first."],
        ),
        decision_group(
            "strategic_direction",
            DecisionType::StrategicDirection,
            &[
                DIAGNOSE_CAPACITY,
                DIAGNOSE_CUSTOMER_QUALITY,
                DIAGNOSE_PRICING,
                OPTIMIZE_PRODUCT_MIX,
                DIAGNOSE_ACQUISITION_QUALITY,
                DIAGNOSE_SCALABILITY,
                OPTIMIZE_SCALING_STRATEGY,
            ],
            &[
                "strategy",
                "direction",
                "focus",
                "what should i do",
                "next step",
                "prioritize",
                "roadmap",
                "positioning",
                "brand",
            ],
            "When direction is unclear, we run the stabilization stack in the safest order, then \
             select a scaling strategy only after diagnostics pass.",
            &[
                "What you sell (or plan to sell) + price points",
                "Your best estimate of costs and time per product",
                "Who you want to serve",
                "Any early lead sources or interest signals",
            ],
            &[
                "If any diagnostic returns FAIL/Do Not Scale, pause downstream directives and fix \
                 upstream constraints.",
            ],
        ),
    ]
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Base gate directive with no inputs, conditions, or advisories.
fn gate(id: &str, title: &str, gate: u8, prerequisites: &[&str]) -> DirectiveSpec {
    DirectiveSpec {
        id: DirectiveId::new(id),
        title: title.to_string(),
        gate: Some(GateNumber::new(gate)),
        kind: DirectiveKind::Gate,
        prerequisites: ids(prerequisites),
        required_inputs: Vec::new(),
        optional_inputs: Vec::new(),
        triggers: Vec::new(),
        metric: None,
        conditions: Vec::new(),
        stop_recommendation: String::new(),
        do_not: Vec::new(),
    }
}

/// Condition with an expected value.
fn condition(field: &str, comparator: Comparator, expected: ExpectedValue) -> ConditionSpec {
    ConditionSpec {
        field: field.to_string(),
        comparator,
        expected: Some(expected),
    }
}

/// Presence condition.
fn exists(field: &str) -> ConditionSpec {
    ConditionSpec {
        field: field.to_string(),
        comparator: Comparator::Exists,
        expected: None,
    }
}

/// Scenario group keyed by pain signal.
fn pain_group(
    id: &str,
    pain_signal: PainSignal,
    directives: &[&str],
    triggers: &[&str],
    why: &str,
    required_inputs: &[&str],
    stop_conditions: &[&str],
) -> ScenarioSpec {
    ScenarioSpec {
        id: ScenarioId::new(format!("pain_{id}")),
        decision_type: None,
        pain_signal: Some(pain_signal),
        directives: ids(directives),
        triggers: strings(triggers),
        why: why.to_string(),
        required_inputs: strings(required_inputs),
        stop_conditions: strings(stop_conditions),
    }
}

/// Scenario group keyed by decision type.
fn decision_group(
    id: &str,
    decision_type: DecisionType,
    directives: &[&str],
    triggers: &[&str],
    why: &str,
    required_inputs: &[&str],
    stop_conditions: &[&str],
) -> ScenarioSpec {
    ScenarioSpec {
        id: ScenarioId::new(id),
        decision_type: Some(decision_type),
        pain_signal: None,
        directives: ids(directives),
        triggers: strings(triggers),
        why: why.to_string(),
        required_inputs: strings(required_inputs),
        stop_conditions: strings(stop_conditions),
    }
}

/// Converts string slices into directive ids.
fn ids(values: &[&str]) -> Vec<DirectiveId> {
    values.iter().map(|value| DirectiveId::new(*value)).collect()
}

/// Converts string slices into owned strings.
fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
