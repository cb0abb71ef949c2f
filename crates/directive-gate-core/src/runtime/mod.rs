// crates/directive-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Directive Gate Runtime
// Description: Formulas, gate evaluation, registry resolution, and routing.
// Purpose: Execute routing requests against the directive catalog.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the routing pipeline. The CLI and any embedding
//! call into the same router so every surface produces identical results.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod comparator;
pub mod diagnostics;
pub mod formulas;
pub mod gate;
pub mod inputs;
pub mod registry;
pub mod router;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comparator::evaluate_comparator;
pub use diagnostics::CapacityReport;
pub use diagnostics::CapacitySummary;
pub use diagnostics::ResourceLoad;
pub use diagnostics::summarize_capacity;
pub use formulas::MetricFormulaEngine;
pub use gate::GateEvaluation;
pub use gate::GateEvaluator;
pub use gate::GateRun;
pub use gate::GateTransitionError;
pub use inputs::FieldReader;
pub use inputs::InputResolver;
pub use registry::CLARIFYING_QUESTION;
pub use registry::DirectiveRegistry;
pub use registry::Resolution;
pub use registry::clarifying_question;
pub use router::DecisionRouter;
pub use router::RouteError;
