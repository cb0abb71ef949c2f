// crates/directive-gate-core/src/runtime/diagnostics.rs
// ============================================================================
// Module: Directive Gate Collaborator Diagnostics
// Description: Typed views over collaborator-produced diagnostic reports.
// Purpose: Summarize capacity reports for gate predicates without recomputing them.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Capacity reports come from an external throughput diagnostic as
//! `resource -> {utilization, bottlenecked}`. The summary only projects the
//! report: peak utilization and the sorted list of resources the collaborator
//! flagged. Bottleneck flags are taken as given.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::DecisionError;

// ============================================================================
// SECTION: Capacity Report
// ============================================================================

/// Load on one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceLoad {
    /// Fraction of available capacity in use.
    pub utilization: f64,
    /// Whether the collaborator flagged this resource as the bottleneck.
    pub bottlenecked: bool,
}

/// Capacity report keyed by resource name.
pub type CapacityReport = BTreeMap<String, ResourceLoad>;

/// Projection of a capacity report used by gate conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    /// Highest utilization across resources.
    pub peak_utilization: f64,
    /// Bottlenecked resource names, sorted.
    pub bottlenecked_resources: Vec<String>,
}

/// Summarizes a capacity report.
///
/// # Errors
///
/// Returns [`DecisionError::InvalidInput`] naming `capacity_report` when the
/// report is empty or a utilization is negative or non-finite.
pub fn summarize_capacity(report: &CapacityReport) -> Result<CapacitySummary, DecisionError> {
    if report.is_empty() {
        return Err(DecisionError::invalid("capacity_report", "must list at least one resource"));
    }
    let mut peak_utilization = 0.0_f64;
    let mut bottlenecked_resources = Vec::new();
    for (resource, load) in report {
        if !load.utilization.is_finite() || load.utilization < 0.0 {
            return Err(DecisionError::invalid(
                "capacity_report",
                format!("utilization for `{resource}` must be a finite number >= 0"),
            ));
        }
        peak_utilization = peak_utilization.max(load.utilization);
        if load.bottlenecked {
            bottlenecked_resources.push(resource.clone());
        }
    }
    Ok(CapacitySummary {
        peak_utilization,
        bottlenecked_resources,
    })
}
