//! Caching layer for the dashboard payload.
//!
//! Provides:
//! - TTL-based expiry (5 minutes by default)
//! - Content-hash keys, so any change to the alert snapshot is a miss
//! - Explicit invalidation for hosts that swap collections
//! - Shared access through an internal `Mutex`

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::aggregate::Aggregator;
use crate::analytics::{build_dashboard, DashboardPayload};
use crate::domain::AlertRecord;
use crate::error::AppError;

pub const DEFAULT_TTL_SECONDS: u64 = 300;

struct CachedDashboard {
    data: DashboardPayload,
    computed_at: SystemTime,
    data_hash: String,
}

pub struct DashboardCache {
    entry: Mutex<Option<CachedDashboard>>,
    ttl_seconds: u64,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECONDS)
    }

    pub fn with_ttl(ttl_seconds: u64) -> Self {
        DashboardCache {
            entry: Mutex::new(None),
            ttl_seconds,
        }
    }

    // The cached value is always replaced whole, so a poisoned lock still holds a usable state.
    fn slot(&self) -> MutexGuard<'_, Option<CachedDashboard>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached payload if the hash matches and the entry has not expired.
    pub fn get(&self, current_hash: &str) -> Option<DashboardPayload> {
        let slot = self.slot();
        let cached = slot.as_ref()?;
        if cached.data_hash != current_hash {
            return None;
        }
        let age = SystemTime::now()
            .duration_since(cached.computed_at)
            .unwrap_or(Duration::from_secs(self.ttl_seconds + 1));
        if age.as_secs() < self.ttl_seconds {
            Some(cached.data.clone())
        } else {
            None
        }
    }

    pub fn set(&self, dashboard: DashboardPayload, hash: String) {
        *self.slot() = Some(CachedDashboard {
            data: dashboard,
            computed_at: SystemTime::now(),
            data_hash: hash,
        });
    }

    pub fn invalidate(&self) {
        *self.slot() = None;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached: self.slot().is_some(),
            ttl_seconds: self.ttl_seconds,
        }
    }

    /// Return the cached payload for this snapshot, building and storing it on a miss.
    ///
    /// The snapshot is validated against the aggregator's policy on every call, hit or miss.
    pub fn get_or_build(
        &self,
        aggregator: &Aggregator,
        alerts: &[AlertRecord],
    ) -> Result<DashboardPayload, AppError> {
        aggregator.validate(alerts)?;
        let hash = compute_alerts_hash(alerts)?;
        if let Some(hit) = self.get(&hash) {
            return Ok(hit);
        }
        let built = build_dashboard(aggregator, alerts)?;
        self.set(built.clone(), hash);
        Ok(built)
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached: bool,
    pub ttl_seconds: u64,
}

/// SHA-256 over the canonical JSON of the snapshot, hex encoded.
pub fn compute_alerts_hash(alerts: &[AlertRecord]) -> Result<String, AppError> {
    let bytes = serde_json::to_vec(alerts).map_err(|e| {
        AppError::new("VALIDATION_SNAPSHOT_ENCODE_FAILED", "Failed to encode alerts for hashing")
            .with_details(e.to_string())
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::DashboardHeadline;
    use std::thread;

    fn empty_dashboard() -> DashboardPayload {
        DashboardPayload {
            version: 1,
            alert_count: 0,
            headline: DashboardHeadline::default(),
            risk_level_counts: vec![],
            status_counts: vec![],
            alert_type_counts: vec![],
            active_feed: vec![],
        }
    }

    #[test]
    fn test_cache_hit() {
        let cache = DashboardCache::new();
        cache.set(empty_dashboard(), "abc123".to_string());

        let result = cache.get("abc123");
        assert!(result.is_some());
        assert_eq!(result.unwrap().alert_count, 0);
    }

    #[test]
    fn test_cache_miss_on_hash_mismatch() {
        let cache = DashboardCache::new();
        cache.set(empty_dashboard(), "abc123".to_string());
        assert!(cache.get("def456").is_none());
    }

    #[test]
    fn test_cache_expiration() {
        let cache = DashboardCache::with_ttl(1);
        cache.set(empty_dashboard(), "abc123".to_string());
        assert!(cache.get("abc123").is_some());

        thread::sleep(Duration::from_millis(1100));
        assert!(cache.get("abc123").is_none());
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = DashboardCache::new();
        cache.set(empty_dashboard(), "abc123".to_string());
        assert!(cache.stats().cached);

        cache.invalidate();
        assert!(cache.get("abc123").is_none());
        assert!(!cache.stats().cached);
    }

    #[test]
    fn test_empty_snapshot_hash_is_stable() {
        let a = compute_alerts_hash(&[]).unwrap();
        let b = compute_alerts_hash(&[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
