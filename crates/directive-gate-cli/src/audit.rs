// crates/directive-gate-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Sinks
// Description: JSON-lines sinks for routing audit events.
// Purpose: Emit one structured event per routing call to stderr or a file.
// Dependencies: directive-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Audit events are serialized as single-line JSON. The stderr sink is used
//! when no audit path is configured; the file sink appends and flushes every
//! event. Write failures are swallowed so auditing never changes a routing
//! outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use directive_gate_config::AuditConfig;
use directive_gate_core::AuditSink;
use directive_gate_core::RoutingAuditEvent;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &RoutingAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &RoutingAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Builds the configured sink, or `None` when auditing is disabled.
///
/// # Errors
///
/// Returns an error when the configured audit file cannot be opened.
pub fn sink_for(config: &AuditConfig) -> io::Result<Option<Box<dyn AuditSink>>> {
    if !config.enabled {
        return Ok(None);
    }
    match &config.path {
        Some(path) => Ok(Some(Box::new(FileAuditSink::new(Path::new(path.trim()))?))),
        None => Ok(Some(Box::new(StderrAuditSink))),
    }
}
