//! # Vibe Score Resolution
//!
//! Every business card shows a vibe index. Resolution runs three tiers:
//!
//! 1. Live API read. Any failure, including a null score, is soft.
//! 2. Cache entry under one hour old, returned verbatim. The timestamp is
//!    not refreshed on read, so there is no sliding expiry; stale entries
//!    stay in place until overwritten.
//! 3. Deterministic fallback derived from the identifier, in [45, 95].
//!
//! Tiers 1 and 3 write the cache, so a generated fallback keeps answering
//! for the rest of the hour even if the API comes back.
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiClient;
use crate::store::VibeStore;

pub const CACHE_KEY: &str = "vibeCache";
pub const CACHE_TTL_MS: i64 = 3_600_000;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub score: i64,
    pub timestamp: i64,
}

impl CacheEntry {
    /// Fresh strictly under one hour from write.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < CACHE_TTL_MS
    }
}

pub struct VibeScores<S: VibeStore> {
    api: ApiClient,
    store: S,
}

impl<S: VibeStore> VibeScores<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store }
    }

    pub async fn get_score(&mut self, business_id: &str) -> i64 {
        let now_ms = epoch_ms();

        if let Some(data) = self.api.fetch_score(business_id).await {
            if let Some(score) = data.score {
                self.write_cache(business_id, score, now_ms);
                return score;
            }
        }

        self.resolve_offline(business_id, now_ms)
    }

    // Tiers 2 and 3. A fresh entry is returned as-is; a miss generates the
    // fallback and records it as if authoritative.
    fn resolve_offline(&mut self, business_id: &str, now_ms: i64) -> i64 {
        if let Some(entry) = self.read_cache(business_id) {
            if entry.is_fresh(now_ms) {
                return entry.score;
            }
        }

        let score = fallback_score(business_id);
        self.write_cache(business_id, score, now_ms);

        score
    }

    fn read_cache(&self, business_id: &str) -> Option<CacheEntry> {
        cache_map(&self.store).get(business_id).copied()
    }

    fn write_cache(&mut self, business_id: &str, score: i64, now_ms: i64) {
        let mut map = cache_map(&self.store);
        map.insert(
            business_id.to_string(),
            CacheEntry {
                score,
                timestamp: now_ms,
            },
        );

        match serde_json::to_string(&map) {
            Ok(blob) => self.store.set(CACHE_KEY, &blob),
            Err(e) => warn!("Cache write error: {e}"),
        }
    }
}

// An unreadable blob reads as an empty cache.
fn cache_map<S: VibeStore>(store: &S) -> HashMap<String, CacheEntry> {
    store
        .get(CACHE_KEY)
        .and_then(|blob| serde_json::from_str(&blob).ok())
        .unwrap_or_default()
}

/// Deterministic score for an identifier: 32-bit rolling hash of its UTF-16
/// code units (`h = h*31 + unit`, wrapping), mapped into [45, 95].
pub fn fallback_score(business_id: &str) -> i64 {
    let mut hash: i32 = 0;
    for unit in business_id.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }

    45 + i64::from(hash.unsigned_abs() % 51)
}

pub fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn scores() -> VibeScores<MemoryStore> {
        VibeScores::new(ApiClient::new("http://localhost:0"), MemoryStore::new())
    }

    #[test]
    fn test_fallback_deterministic_and_in_range() {
        for id in ["pier-tiki-bar", "a", "café-del-mar", "x9", "the-longest-business-identifier-seen"] {
            let first = fallback_score(id);
            let second = fallback_score(id);

            assert_eq!(first, second);
            assert!((45..=95).contains(&first), "{id} scored {first}");
        }
    }

    #[test]
    fn test_fallback_known_value() {
        // h("abc") = (0*31+97)*31+98 = 3105, *31+99 = 96354; 96354 % 51 = 15
        assert_eq!(fallback_score("abc"), 60);
    }

    #[test]
    fn test_cache_entry_hour_boundary() {
        let entry = CacheEntry {
            score: 72,
            timestamp: 1_000,
        };

        assert!(entry.is_fresh(1_000 + 3_599_999));
        assert!(!entry.is_fresh(1_000 + 3_600_000));
        assert!(!entry.is_fresh(1_000 + 3_600_001));
    }

    #[test]
    fn test_fresh_entry_returned_verbatim_without_refresh() {
        let mut scores = scores();
        scores.write_cache("dockside", 88, 500);

        let resolved = scores.resolve_offline("dockside", 500 + CACHE_TTL_MS - 1);

        assert_eq!(resolved, 88);
        // no sliding expiry: the stored timestamp is untouched by the read
        let entry = scores.read_cache("dockside").unwrap();
        assert_eq!(entry.timestamp, 500);
    }

    #[test]
    fn test_stale_entry_replaced_by_fallback() {
        let mut scores = scores();
        scores.write_cache("dockside", 88, 500);

        let resolved = scores.resolve_offline("dockside", 500 + CACHE_TTL_MS + 1);

        assert_eq!(resolved, fallback_score("dockside"));
        let entry = scores.read_cache("dockside").unwrap();
        assert_eq!(entry.score, resolved);
        assert_eq!(entry.timestamp, 500 + CACHE_TTL_MS + 1);
    }

    #[test]
    fn test_fallback_written_as_authoritative() {
        let mut scores = scores();

        let first = scores.resolve_offline("dockside", 1_000);
        // a later read within the hour answers from cache with the same value
        let second = scores.resolve_offline("dockside", 2_000);

        assert_eq!(first, second);
        assert_eq!(scores.read_cache("dockside").unwrap().score, first);
    }

    #[test]
    fn test_corrupt_cache_blob_reads_as_empty() {
        let mut store = MemoryStore::new();
        crate::store::VibeStore::set(&mut store, CACHE_KEY, "not json");
        let mut scores = VibeScores::new(ApiClient::new("http://localhost:0"), store);

        let resolved = scores.resolve_offline("dockside", 1_000);

        assert_eq!(resolved, fallback_score("dockside"));
    }
}
