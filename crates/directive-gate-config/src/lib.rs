// crates/directive-gate-config/src/lib.rs
// ============================================================================
// Module: Directive Gate Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for directive-gate.toml semantics.
// Dependencies: directive-gate-core, serde, time, toml
// ============================================================================

//! ## Overview
//! `directive-gate-config` defines the configuration model for Directive
//! Gate: definitions status, policy constants, audit settings, and optional
//! catalog overrides. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted; every limit is enforced
//! before parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
