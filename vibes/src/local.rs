//! Anonymous visitor state: favorites, vibe counters, consent preferences.
//!
//! Each lives in its own blob on the injected store. Logged-in favorites go
//! through the server API instead; these lists are keyed by no user at all.
use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::VibeStore;

pub const FAVORITES_KEY: &str = "favorites";
pub const USER_VIBES_KEY: &str = "userVibes";
pub const CONSENT_KEY: &str = "consent";
pub const CONSENT_VERSION: &str = "1.0";

pub fn favorites<S: VibeStore>(store: &S) -> Vec<String> {
    read_blob(store, FAVORITES_KEY)
}

/// Add when absent, remove when present. Returns whether the business is
/// favorited after the toggle.
pub fn toggle_favorite<S: VibeStore>(store: &mut S, business_id: &str) -> bool {
    let mut favorites: Vec<String> = read_blob(store, FAVORITES_KEY);

    let now_favorited = match favorites.iter().position(|id| id == business_id) {
        Some(index) => {
            favorites.remove(index);
            false
        }
        None => {
            favorites.push(business_id.to_string());
            true
        }
    };

    write_blob(store, FAVORITES_KEY, &favorites);
    now_favorited
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VibeCounter {
    pub count: u32,
    pub updated_at: String,
}

/// Bump the local vibe counter for a business and stamp it. Returns the new
/// count.
pub fn record_vibe<S: VibeStore>(store: &mut S, business_id: &str) -> u32 {
    let mut counters: HashMap<String, VibeCounter> = read_blob(store, USER_VIBES_KEY);

    let count = counters.get(business_id).map_or(0, |entry| entry.count) + 1;
    counters.insert(
        business_id.to_string(),
        VibeCounter {
            count,
            updated_at: Utc::now().to_rfc3339(),
        },
    );

    write_blob(store, USER_VIBES_KEY, &counters);
    count
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConsentPreferences {
    pub analytics: bool,
    pub marketing: bool,
    pub essential: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Stored consent, if present and written by the current banner version.
/// Preferences from an older version read as absent so the banner reprompts.
pub fn stored_consent<S: VibeStore>(store: &S) -> Option<ConsentPreferences> {
    let blob = store.get(CONSENT_KEY)?;
    let consent: ConsentPreferences = serde_json::from_str(&blob).ok()?;

    (consent.version == CONSENT_VERSION).then_some(consent)
}

pub fn store_consent<S: VibeStore>(
    store: &mut S,
    analytics: bool,
    marketing: bool,
    method: Option<&str>,
) -> ConsentPreferences {
    let consent = ConsentPreferences {
        analytics,
        marketing,
        essential: true,
        method: method.map(str::to_string),
        version: CONSENT_VERSION.to_string(),
        timestamp: Some(Utc::now().to_rfc3339()),
    };

    write_blob(store, CONSENT_KEY, &consent);
    consent
}

fn read_blob<S: VibeStore, T: Default + for<'de> Deserialize<'de>>(store: &S, key: &str) -> T {
    store
        .get(key)
        .and_then(|blob| serde_json::from_str(&blob).ok())
        .unwrap_or_default()
}

fn write_blob<S: VibeStore, T: Serialize>(store: &mut S, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(blob) => store.set(key, &blob),
        Err(e) => warn!("Failed to encode {key} blob: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_favorite_toggle_roundtrip() {
        let mut store = MemoryStore::new();

        assert!(toggle_favorite(&mut store, "dockside"));
        assert!(toggle_favorite(&mut store, "pier-tiki-bar"));
        assert_eq!(favorites(&store), vec!["dockside", "pier-tiki-bar"]);

        assert!(!toggle_favorite(&mut store, "dockside"));
        assert_eq!(favorites(&store), vec!["pier-tiki-bar"]);
    }

    #[test]
    fn test_vibe_counter_increments() {
        let mut store = MemoryStore::new();

        assert_eq!(record_vibe(&mut store, "dockside"), 1);
        assert_eq!(record_vibe(&mut store, "dockside"), 2);
        assert_eq!(record_vibe(&mut store, "pier-tiki-bar"), 1);
    }

    #[test]
    fn test_consent_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(stored_consent(&store), None);

        store_consent(&mut store, true, false, Some("banner"));
        let consent = stored_consent(&store).unwrap();

        assert!(consent.analytics);
        assert!(!consent.marketing);
        assert!(consent.essential);
    }

    #[test]
    fn test_consent_version_mismatch_reads_as_absent() {
        let mut store = MemoryStore::new();
        let mut consent = store_consent(&mut store, true, true, None);
        consent.version = "0.9".to_string();
        store.set(CONSENT_KEY, &serde_json::to_string(&consent).unwrap());

        assert_eq!(stored_consent(&store), None);
    }
}
