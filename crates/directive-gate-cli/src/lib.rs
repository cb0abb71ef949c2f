// crates/directive-gate-cli/src/lib.rs
// ============================================================================
// Module: Directive Gate CLI Library
// Description: Shared helpers for the Directive Gate command-line interface.
// Purpose: Provide reusable components (i18n, audit sinks, report rendering).
// Dependencies: directive-gate-core, serde_json
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the message catalog, the
//! JSON-lines audit sinks, and the text routing report. The binary entry
//! point (`src/main.rs`) imports these helpers to keep all user-facing
//! output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// JSON-lines audit sinks for routing events.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Text rendering for routing results and directive listings.
pub mod render;
