// crates/directive-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Directive Gate Interfaces
// Description: Backend-agnostic audit interface for routing calls.
// Purpose: Define the contract surface routing uses to emit audit events.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Routing emits one structured audit event per call. Sinks decide where the
//! event goes (stderr, an append-only file, nowhere). Events carry canonical
//! hashes of the request and result; raw payloads are included only when the
//! caller opts in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::DirectiveId;
use crate::core::HashDigest;

// ============================================================================
// SECTION: Payload Policy
// ============================================================================

/// Whether audit events carry raw payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPayloads {
    /// Hashes only.
    #[default]
    HashOnly,
    /// Hashes plus raw request and result JSON.
    Full,
}

impl AuditPayloads {
    /// Stable redaction label recorded on each event.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HashOnly => "hash_only",
            Self::Full => "full",
        }
    }

    /// Maps the `include_payloads` config flag.
    #[must_use]
    pub const fn from_include_payloads(include: bool) -> Self {
        if include { Self::Full } else { Self::HashOnly }
    }
}

// ============================================================================
// SECTION: Routing Audit Event
// ============================================================================

/// Audit event emitted once per routing call.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Final decision label.
    pub decision: &'static str,
    /// Directive that halted the route, when any.
    pub stopping_directive: Option<DirectiveId>,
    /// Number of directives that reached gate evaluation.
    pub executed_count: usize,
    /// Number of directives that passed.
    pub passed_count: usize,
    /// Canonical hash of the request.
    pub request_hash: HashDigest,
    /// Canonical hash of the result.
    pub result_hash: HashDigest,
    /// Raw request payload (explicit opt-in only).
    pub request: Option<Value>,
    /// Raw result payload (explicit opt-in only).
    pub result: Option<Value>,
    /// Redaction classification for payload logging.
    pub redaction: &'static str,
}

/// Inputs required to construct a routing audit event.
pub struct RoutingAuditEventParams {
    /// Final decision label.
    pub decision: &'static str,
    /// Directive that halted the route, when any.
    pub stopping_directive: Option<DirectiveId>,
    /// Number of directives that reached gate evaluation.
    pub executed_count: usize,
    /// Number of directives that passed.
    pub passed_count: usize,
    /// Canonical hash of the request.
    pub request_hash: HashDigest,
    /// Canonical hash of the result.
    pub result_hash: HashDigest,
    /// Raw request payload (explicit opt-in only).
    pub request: Option<Value>,
    /// Raw result payload (explicit opt-in only).
    pub result: Option<Value>,
    /// Payload policy in effect.
    pub payloads: AuditPayloads,
}

impl RoutingAuditEvent {
    /// Creates a new routing audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RoutingAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "routing_audit",
            timestamp_ms,
            decision: params.decision,
            stopping_directive: params.stopping_directive,
            executed_count: params.executed_count,
            passed_count: params.passed_count,
            request_hash: params.request_hash,
            result_hash: params.result_hash,
            request: params.request,
            result: params.result,
            redaction: params.payloads.label(),
        }
    }
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink for routing events.
pub trait AuditSink: Send + Sync {
    /// Record a routing audit event.
    fn record(&self, event: &RoutingAuditEvent);
}

/// Audit sink that drops events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &RoutingAuditEvent) {}
}
