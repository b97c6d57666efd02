//! Memoizing wrapper around a [`StateSource`].
//!
//! Resolution is a pure function of the input, so a cached answer is always
//! the answer a fresh evaluation would give. Failures are cached as well.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use lru::LruCache;
use psy_props::Quantity;
use serde::Serialize;
use tracing::debug;

use crate::error::CalcResult;
use crate::input::PsychroInput;
use crate::state::{ResolvedState, StateSource};

/// Exact input: every code with the bit pattern of its value, pressure included.
type CacheKey = Vec<(Quantity, u64)>;

fn cache_key(input: &PsychroInput) -> CacheKey {
    input.iter().map(|(q, v)| (q, v.to_bits())).collect()
}

struct CacheEntry {
    value: CalcResult<ResolvedState>,
    stored_at: Instant,
}

/// Hit/miss counters and current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// LRU cache in front of another resolver, with an optional time-to-live.
pub struct CachedResolver<S> {
    inner: S,
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: StateSource> CachedResolver<S> {
    pub fn new(inner: S, capacity: NonZeroUsize, ttl: Option<Duration>) -> Self {
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: entries.len(),
            capacity: entries.cap().get(),
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave an entry half written.
    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(&self, key: &CacheKey) -> Option<CalcResult<ResolvedState>> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => self
                .ttl
                .is_some_and(|ttl| entry.stored_at.elapsed() >= ttl),
        };
        if expired {
            entries.pop(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }
}

impl<S: StateSource> StateSource for CachedResolver<S> {
    fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState> {
        let key = cache_key(input);
        if let Some(value) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(?key, "cache miss");
        // Evaluated outside the lock; concurrent misses on one key compute the
        // same value.
        let value = self.inner.resolve(input);
        self.lock().put(
            key,
            CacheEntry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalculationError;
    use std::sync::atomic::AtomicUsize;

    /// Returns the dry-bulb back as every field and counts calls.
    struct Echo {
        calls: AtomicUsize,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl StateSource for Echo {
        fn resolve(&self, input: &PsychroInput) -> CalcResult<ResolvedState> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let t = input
                .get(Quantity::T)
                .ok_or(CalculationError::InvalidValue {
                    quantity: Quantity::T,
                })?;
            Ok(ResolvedState {
                tdb: t,
                twb: t,
                rh: t,
                w: t,
                h: t,
                tdp: t,
            })
        }
    }

    fn input(t: f64) -> PsychroInput {
        PsychroInput::with_pair(101325.0, (Quantity::T, t), (Quantity::R, 0.5))
    }

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn repeated_input_hits() {
        let cache = CachedResolver::new(Echo::new(), cap(8), None);
        let first = cache.resolve(&input(300.0));
        let second = cache.resolve(&input(300.0));
        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn key_includes_pressure_and_exact_bits() {
        let cache = CachedResolver::new(Echo::new(), cap(8), None);
        cache.resolve(&input(300.0)).unwrap();
        cache.resolve(&input(300.0).with_pressure(90000.0)).unwrap();
        cache.resolve(&input(300.0 + 1e-12)).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn errors_are_cached() {
        let cache = CachedResolver::new(Echo::new(), cap(8), None);
        let no_t = PsychroInput::with_pair(101325.0, (Quantity::R, 0.5), (Quantity::W, 0.01));
        assert!(cache.resolve(&no_t).is_err());
        assert!(cache.resolve(&no_t).is_err());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let cache = CachedResolver::new(Echo::new(), cap(2), None);
        cache.resolve(&input(300.0)).unwrap();
        cache.resolve(&input(301.0)).unwrap();
        cache.resolve(&input(300.0)).unwrap();
        cache.resolve(&input(302.0)).unwrap();
        // 301 was evicted, 300 survived.
        cache.resolve(&input(300.0)).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 3);
        cache.resolve(&input(301.0)).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn expired_entries_are_recomputed() {
        let cache = CachedResolver::new(Echo::new(), cap(8), Some(Duration::ZERO));
        cache.resolve(&input(300.0)).unwrap();
        cache.resolve(&input(300.0)).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn clear_empties() {
        let cache = CachedResolver::new(Echo::new(), cap(8), None);
        cache.resolve(&input(300.0)).unwrap();
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        cache.resolve(&input(300.0)).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }
}
