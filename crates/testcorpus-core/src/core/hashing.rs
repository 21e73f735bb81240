// crates/testcorpus-core/src/core/hashing.rs
// ============================================================================
// Module: Corpus Digests
// Description: SHA-256 digests of summaries and staged container bytes.
// Purpose: Let dry runs and repeated aggregations be compared by value.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! A summary digest is taken over the RFC 8785 (JCS) form of the summary, so
//! formatting and key order never change it. A staged write digest is taken
//! over the exact bytes that will land on disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::CorpusError;

// ============================================================================
// SECTION: Digest
// ============================================================================

/// Digest algorithm label carried in manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

/// Lowercase hex digest with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashDigest {
    /// Algorithm that produced `value`.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

impl HashDigest {
    /// Digests raw bytes.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut value = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(value, "{byte:02x}");
        }
        Self {
            algorithm: HashAlgorithm::Sha256,
            value,
        }
    }

    /// Digests the canonical JSON form of a value.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when canonicalization fails.
    pub fn of_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, CorpusError> {
        let bytes =
            serde_jcs::to_vec(value).map_err(|err| CorpusError::Serialization(err.to_string()))?;
        Ok(Self::of_bytes(&bytes))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
