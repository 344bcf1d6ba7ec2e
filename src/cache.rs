//! Process-lifetime analysis cache keyed by content hash.
//!
//! Identical uploads are byte-identical, so the SHA-256 of the raw bytes is
//! the dedup key; collision probability is negligible at this scale. Entries
//! are immutable once inserted: [`AnalysisCache::lookup`] returns a clone,
//! never a reference, so callers cannot mutate what later requests will see.
//!
//! The map grows without bound for the life of the process — there is no
//! eviction and no persistence. Deployments that outlive a few thousand
//! distinct uploads should front this with an LRU; for the expected request
//! volume the simplicity wins.

use crate::analysis::AnalysisResult;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Hex-encoded SHA-256 of the raw upload bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Concurrent map from content hash to a previously computed analysis.
///
/// Shared across request handlers behind an `Arc`; the `RwLock` makes the
/// read-mostly access pattern cheap.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: RwLock<HashMap<String, AnalysisResult>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the cached analysis for `hash`, if present.
    pub fn lookup(&self, hash: &str) -> Option<AnalysisResult> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(hash)
            .cloned()
    }

    /// Insert (or overwrite, last-write-wins) the analysis for `hash`.
    pub fn insert(&self, hash: String, result: AnalysisResult) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash, result);
    }

    /// Number of distinct uploads analyzed so far.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
