// crates/directive-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Directive Gate Route Digests
// Description: Canonical digests of routing requests and results.
// Purpose: Let audit events identify a routing call without carrying its payloads.
// Dependencies: crate::core::{request, result}, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Every audited routing call is fingerprinted by two digests: one over the
//! request the caller sent, one over the result the router returned. Both
//! are taken over RFC 8785 (JCS) canonical JSON, so provided fields listed in
//! a different order, or metrics merged in a different sequence, still map
//! to the same digest. Two events with equal digests routed the same request
//! to the same outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::request::RoutingRequest;
use crate::core::result::RoutingResult;

// ============================================================================
// SECTION: Digest Types
// ============================================================================

/// Digest algorithms an audit event may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 over canonical JSON.
    Sha256,
}

/// Algorithm used for routing audit digests.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// One digest as written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Algorithm that produced the digest.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

/// Request and result digests for one routing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDigests {
    /// Digest of the routing request.
    pub request_hash: HashDigest,
    /// Digest of the routing result.
    pub result_hash: HashDigest,
}

impl RouteDigests {
    /// Fingerprints a routing call.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when either side cannot be
    /// rendered as canonical JSON.
    pub fn compute(
        algorithm: HashAlgorithm,
        request: &RoutingRequest,
        result: &RoutingResult,
    ) -> Result<Self, HashError> {
        Ok(Self {
            request_hash: hash_canonical_json(algorithm, request)?,
            result_hash: hash_canonical_json(algorithm, result)?,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Digest failures.
#[derive(Debug, Error)]
pub enum HashError {
    /// The value could not be rendered as canonical JSON.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Digests the RFC 8785 canonical form of `value`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let canonical =
        serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))?;
    let bytes = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(&canonical),
    };
    let hex = bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    });
    Ok(HashDigest {
        algorithm,
        value: hex,
    })
}
