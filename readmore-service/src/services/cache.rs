use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
/// Longer TTLs are clamped so `Instant + ttl` cannot overflow.
pub const MAX_TTL: Duration = Duration::from_secs(86_400 * 365 * 30);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Time-bounded memoization of catalog responses.
///
/// Expired entries are evicted lazily when they are next looked up (or when the
/// cache is full and room is needed). There is no background sweeper.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ttl.min(MAX_TTL),
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // Poisoning is ignored: every critical section leaves the map consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();

        if entries.get(key)?.is_expired(now) {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = Instant::now();
        let mut entries = self.lock();

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| !entry.is_expired(now));

            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_hit_before_expiry() {
        let cache: ResponseCache<Vec<i32>> = ResponseCache::default();
        cache.set("search:dune:20", vec![1, 2, 3]);

        tokio::time::advance(Duration::from_secs(59)).await;

        assert_eq!(cache.get("search:dune:20"), Some(vec![1, 2, 3]));
        assert_eq!(cache.get("search:dune:10"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_absent_and_removed() {
        let cache: ResponseCache<String> = ResponseCache::default();
        cache.set("work:OL1W", "detail".to_string());

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("work:OL1W"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_expiry() {
        let cache: ResponseCache<i32> = ResponseCache::new(Duration::from_secs(10), 16);
        cache.set("k", 1);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("k", 2);
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_evicts_soonest_to_expire() {
        let cache: ResponseCache<i32> = ResponseCache::new(Duration::from_secs(60), 2);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.set("b", 2);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.set("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_prefers_dropping_expired() {
        let cache: ResponseCache<i32> = ResponseCache::new(Duration::from_secs(10), 2);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("b", 2);
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.set("c", 3);

        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_clamped() {
        let cache: ResponseCache<i32> = ResponseCache::new(Duration::from_secs(u64::MAX), 4);
        cache.set("k", 1);

        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;

        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = Arc::new(ResponseCache::<i32>::default());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for j in 0..100 {
                    cache.set(format!("subject:s{}:{}", i, j), j);
                    assert_eq!(cache.get(&format!("subject:s{}:{}", i, j)), Some(j));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 800);
    }
}
