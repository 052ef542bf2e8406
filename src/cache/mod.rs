//! Process-local, time-expiring cache for the coupon catalog.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::CacheConfig;

/// Logical key under which the full coupon catalog is stored.
pub const CATALOG_KEY: &str = "coupons:catalog";

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Time-expiring key/value cache shared across request handlers.
///
/// Entries live for the configured TTL after insertion. Expired entries are
/// dropped on read and swept on a fixed cycle by the task spawned from
/// [`CatalogCache::spawn_sweeper`]. The backing `DashMap` keeps individual
/// operations safe under concurrent access without any external lock, so no
/// lock is ever held across a store query and a cache update.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl())
    }

    /// Returns the live value under `key`, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        // The shard guard must be released before removing.
        self.store.remove(key);
        None
    }

    /// Stores `value` under `key`, stamped with the configured TTL.
    pub fn insert(&self, key: &str, value: String) {
        self.store
            .insert(key.to_string(), CacheEntry::new(value, self.ttl));
    }

    /// Drops the entry under `key`, if any.
    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) {
        self.store.retain(|_, entry| !entry.is_expired());
    }

    /// Spawns a background task sweeping expired entries every `cycle`.
    pub fn spawn_sweeper(&self, cycle: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cycle);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.purge_expired();
                debug!(entries = cache.store.len(), "swept catalog cache");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_inserted_value() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        cache.insert(CATALOG_KEY, "[]".to_string());
        assert_eq!(cache.get(CATALOG_KEY), Some("[]".to_string()));
    }

    #[test]
    fn get_misses_on_unknown_key() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn invalidate_drops_entry() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        cache.insert(CATALOG_KEY, "[]".to_string());
        cache.invalidate(CATALOG_KEY);
        assert_eq!(cache.get(CATALOG_KEY), None);
    }

    #[test]
    fn expired_entry_is_dropped_on_read() {
        let cache = CatalogCache::new(Duration::from_millis(10));
        cache.insert(CATALOG_KEY, "[]".to_string());
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get(CATALOG_KEY), None);
        assert!(cache.store.is_empty());
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let cache = CatalogCache::new(Duration::from_millis(10));
        cache.insert("stale", "a".to_string());
        std::thread::sleep(Duration::from_millis(25));
        cache.insert("fresh", "b".to_string());

        cache.purge_expired();

        assert_eq!(cache.get("stale"), None);
        assert_eq!(cache.get("fresh"), Some("b".to_string()));
    }

    #[test]
    fn reinsert_refreshes_expiry() {
        let cache = CatalogCache::new(Duration::from_millis(50));
        cache.insert(CATALOG_KEY, "old".to_string());
        cache.insert(CATALOG_KEY, "new".to_string());
        assert_eq!(cache.get(CATALOG_KEY), Some("new".to_string()));
    }
}
