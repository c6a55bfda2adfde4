//! TTL cache with per-key request deduplication.
//!
//! Read-heavy, slowly-changing collections go through this cache; writes
//! invalidate explicitly. Concurrent `get_or_fetch` calls on one key while
//! a producer is in flight coalesce into a single producer invocation;
//! distinct keys never serialize each other. No eviction beyond TTL and
//! explicit invalidation; the key set is a handful of well-known names.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Duration, Utc};
use talenta_models::SharedClock;
use tracing::debug;

use crate::metrics::record_cache_lookup;

struct Entry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// Clock-driven TTL cache.
pub struct TtlCache<T: Clone> {
    clock: SharedClock,
    entries: RwLock<HashMap<String, Entry<T>>>,
    /// One gate per key; holding it marks a producer in flight.
    flights: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            entries: RwLock::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value if it is younger than `ttl`, otherwise run
    /// the producer and store its result under a fresh timestamp.
    ///
    /// A failed producer caches nothing; the next caller retries.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup(key, ttl) {
            record_cache_lookup(key, true);
            debug!(key, "Cache hit");
            return Ok(value);
        }
        record_cache_lookup(key, false);

        let gate = self.flight_gate(key);
        let _in_flight = gate.lock().await;

        // Another caller may have produced while we waited on the gate.
        if let Some(value) = self.lookup(key, ttl) {
            debug!(key, "Cache filled while waiting");
            return Ok(value);
        }

        let value = producer().await?;
        self.store(key, value.clone());
        Ok(value)
    }

    /// Remove one entry immediately.
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().expect("cache poisoned");
        if entries.remove(key).is_some() {
            debug!(key, "Cache invalidated");
        }
    }

    /// Remove every entry immediately.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().expect("cache poisoned");
        if !entries.is_empty() {
            debug!(count = entries.len(), "Cache cleared");
            entries.clear();
        }
    }

    fn lookup(&self, key: &str, ttl: Duration) -> Option<T> {
        let entries = self.entries.read().expect("cache poisoned");
        let entry = entries.get(key)?;
        if self.clock.now() - entry.stored_at < ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn store(&self, key: &str, value: T) {
        let mut entries = self.entries.write().expect("cache poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: self.clock.now(),
            },
        );
    }

    fn flight_gate(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = self.flights.lock().expect("cache poisoned");
        Arc::clone(flights.entry(key.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use talenta_models::ManualClock;

    use super::*;

    type TestResult<T> = Result<T, String>;

    fn cache(clock: Arc<ManualClock>) -> TtlCache<u32> {
        TtlCache::new(clock)
    }

    #[tokio::test]
    async fn serves_cached_value_within_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(Arc::clone(&clock));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: TestResult<u32> = cache
                .get_or_fetch("k", Duration::minutes(3), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value.unwrap(), 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refetches_once_ttl_elapsed() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(Arc::clone(&clock));
        let calls = AtomicUsize::new(0);

        let fetch = |v: u32| {
            let calls = &calls;
            cache.get_or_fetch("k", Duration::minutes(3), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                TestResult::Ok(v)
            })
        };

        assert_eq!(fetch(1).await.unwrap(), 1);

        // One millisecond short of the TTL: still cached
        clock.advance(Duration::minutes(3) - Duration::milliseconds(1));
        assert_eq!(fetch(2).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // At the TTL boundary the entry is stale
        clock.advance(Duration::milliseconds(1));
        assert_eq!(fetch(3).await.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(Arc::clone(&clock));
        let calls = AtomicUsize::new(0);

        let _: TestResult<u32> = cache
            .get_or_fetch("k", Duration::minutes(3), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;

        cache.invalidate("k");

        let value: TestResult<u32> = cache
            .get_or_fetch("k", Duration::minutes(3), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await;

        assert_eq!(value.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_key() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(Arc::clone(&clock));

        let _: TestResult<u32> = cache
            .get_or_fetch("a", Duration::minutes(3), || async { Ok(1) })
            .await;
        let _: TestResult<u32> = cache
            .get_or_fetch("b", Duration::minutes(3), || async { Ok(2) })
            .await;

        cache.invalidate_all();

        let calls = AtomicUsize::new(0);
        for key in ["a", "b"] {
            let _: TestResult<u32> = cache
                .get_or_fetch(key, Duration::minutes(3), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(9)
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_producer_caches_nothing() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache(Arc::clone(&clock));

        let failed: TestResult<u32> = cache
            .get_or_fetch("k", Duration::minutes(3), || async {
                Err("remote down".to_string())
            })
            .await;
        assert!(failed.is_err());

        let calls = AtomicUsize::new(0);
        let value: TestResult<u32> = cache
            .get_or_fetch("k", Duration::minutes(3), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(5)
            })
            .await;
        assert_eq!(value.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_coalesce_into_one_producer_run() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = Arc::new(cache(Arc::clone(&clock)));
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = || {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_fetch("k", Duration::minutes(3), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Hold the flight open long enough for the other
                        // callers to pile up on the gate.
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        TestResult::Ok(42)
                    })
                    .await
            }
        };

        let (a, b, c) = tokio::join!(fetch(), fetch(), fetch());
        assert_eq!(a.unwrap(), 42);
        assert_eq!(b.unwrap(), 42);
        assert_eq!(c.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
