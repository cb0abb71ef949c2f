// crates/directive-gate-core/src/core/mod.rs
// ============================================================================
// Module: Directive Gate Core Types
// Description: Canonical request, policy, catalog, metric, and result types.
// Purpose: Provide stable, serializable types for routing and formulas.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types are pure data: requests, policy constants, the directive
//! catalog, metric inputs and results, and the routing result. Runtime
//! modules consume them; nothing here performs I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod directive;
pub mod error;
pub mod hashing;
pub mod identifiers;
pub mod intent;
pub mod metrics;
pub mod policy;
pub mod request;
pub mod result;
pub mod tristate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::builtin_catalog;
pub use catalog::builtin_directives;
pub use catalog::builtin_scenarios;
pub use directive::CatalogError;
pub use directive::Comparator;
pub use directive::ConditionSpec;
pub use directive::DirectiveCatalog;
pub use directive::DirectiveKind;
pub use directive::DirectiveSpec;
pub use directive::ExpectedValue;
pub use directive::MetricStep;
pub use directive::ScenarioSpec;
pub use error::DecisionError;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::RouteDigests;
pub use hashing::hash_canonical_json;
pub use identifiers::DirectiveId;
pub use identifiers::GateNumber;
pub use identifiers::ScenarioId;
pub use intent::DecisionType;
pub use intent::PainSignal;
pub use intent::TimeHorizon;
pub use metrics::AcquisitionCosts;
pub use metrics::CacInputs;
pub use metrics::CacResult;
pub use metrics::ChannelSpend;
pub use metrics::ContributionWarning;
pub use metrics::ExpectedOrder;
pub use metrics::GuardrailRatio;
pub use metrics::LtvResult;
pub use metrics::MetricInputs;
pub use metrics::OrderBreakdown;
pub use metrics::OrderContribution;
pub use metrics::OrderProfile;
pub use metrics::RepeatOrder;
pub use metrics::RepeatProfile;
pub use policy::DefinitionsStatus;
pub use policy::PolicyConstants;
pub use policy::PolicyKey;
pub use request::RoutingRequest;
pub use result::BlockReason;
pub use result::ConditionTrace;
pub use result::DirectiveOutcome;
pub use result::GateState;
pub use result::RoutingDecision;
pub use result::RoutingResult;
pub use tristate::TriState;
