// crates/directive-gate-core/src/lib.rs
// ============================================================================
// Module: Directive Gate Core Library
// Description: Public API surface for the Directive Gate core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Directive Gate core computes customer economics (contribution, LTV, CAC,
//! and the LTV:CAC guardrail) and routes business decisions through an
//! ordered sequence of diagnostic gates. Evaluation is deterministic, pure,
//! and fails closed: missing data blocks a gate, it is never defaulted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AuditPayloads;
pub use interfaces::AuditSink;
pub use interfaces::NoopAuditSink;
pub use interfaces::RoutingAuditEvent;
pub use interfaces::RoutingAuditEventParams;
pub use runtime::CapacityReport;
pub use runtime::DecisionRouter;
pub use runtime::DirectiveRegistry;
pub use runtime::FieldReader;
pub use runtime::GateEvaluator;
pub use runtime::GateRun;
pub use runtime::GateTransitionError;
pub use runtime::InputResolver;
pub use runtime::MetricFormulaEngine;
pub use runtime::Resolution;
pub use runtime::RouteError;
