//! Keyed Cache Module
//!
//! The cache policy: lazy TTL expiration through randomized sweeps and
//! single-step eviction of the oldest entry when over capacity.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::ops::{Add, Sub};
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::cache::clock::ttl_ms;
use crate::cache::{
    CacheBuilder, CacheStats, Clock, ExpiryIndex, Store, SystemClock, SWEEP_SAMPLES,
};
use crate::config::Config;

// == Keyed Cache ==
/// An in-memory key-value cache with optional per-entry TTL and an optional
/// maximum entry count.
///
/// Expired entries are not removed on a timer. Every operation except
/// [`clear`](Self::clear) first runs a small randomized sweep over the keys
/// that carry a TTL, and an expired entry addressed directly by
/// [`has`](Self::has), [`get`](Self::get) or [`delete`](Self::delete) is
/// removed on the spot. An expired entry can therefore stay in memory until
/// it is touched, sampled or evicted, but it is never returned.
///
/// When a capacity is set, each write evicts at most one entry: the oldest
/// inserted or least recently read key.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use local_cache::KeyedCache;
///
/// let mut cache: KeyedCache<String, i64> = KeyedCache::new(2);
/// cache.set("a".to_string(), 1, Duration::ZERO);
/// cache.set("b".to_string(), 2, Duration::from_secs(60));
/// assert_eq!(cache.get("a"), Some(&1));
///
/// // "b" is now the oldest entry and makes room for "c"
/// cache.set("c".to_string(), 3, Duration::ZERO);
/// assert!(!cache.has("b"));
/// ```
#[derive(Debug)]
pub struct KeyedCache<K, V, C = SystemClock> {
    /// Values in insertion-or-touch order
    store: Store<K, V>,
    /// Deadlines for TTL-bearing keys
    expiry: ExpiryIndex<K>,
    /// Maximum number of entries, None = unbounded
    capacity: Option<NonZeroUsize>,
    /// Time source for deadlines
    clock: C,
    /// Source of sweep samples
    rng: StdRng,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> KeyedCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_entries` entries (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        CacheBuilder::new().max_entries(max_entries).build()
    }

    /// Creates a cache without a capacity limit.
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        info!(
            max_entries = config.max_entries,
            seeded = config.rng_seed.is_some(),
            "Cache initialized from configuration"
        );
        CacheBuilder::from_config(config).build()
    }
}

impl<K, V, C> KeyedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    pub(crate) fn from_parts(capacity: Option<NonZeroUsize>, clock: C, rng: StdRng) -> Self {
        Self {
            store: Store::new(),
            expiry: ExpiryIndex::new(),
            capacity,
            clock,
            rng,
            stats: CacheStats::new(),
        }
    }

    // == Has ==
    /// Returns true if `key` holds a live entry.
    ///
    /// An expired entry found here is removed. The key's position in the
    /// eviction order is left unchanged.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.sweep();

        if !self.store.contains_key(key) {
            return false;
        }
        if self.is_expired(key) {
            self.expire(key);
            return false;
        }
        true
    }

    // == Get ==
    /// Returns the value stored at `key`, or None if it is absent or expired.
    ///
    /// A successful read moves the key to the most recently used position,
    /// protecting it from eviction. Reads never extend the TTL.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.sweep();

        if !self.store.contains_key(key) {
            self.stats.record_miss();
            return None;
        }
        if self.is_expired(key) {
            self.expire(key);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.store.touch(key)
    }

    // == Set ==
    /// Stores `value` at `key`, replacing any existing entry.
    ///
    /// A non-zero `ttl` makes the entry expire at `now + ttl`, rounded up to
    /// whole milliseconds; `Duration::ZERO` stores it without expiry. The entry takes the newest
    /// position, then at most one entry is evicted if the cache is over
    /// capacity.
    ///
    /// Returns the value previously stored at `key`, if any. The previous
    /// value is returned even if it had already expired but was not yet
    /// reclaimed.
    pub fn set(&mut self, key: K, value: V, ttl: Duration) -> Option<V> {
        self.sweep();

        let old_value = self.remove_entry(&key);

        if !ttl.is_zero() {
            let deadline = self.clock.now_ms().saturating_add(ttl_ms(ttl));
            self.expiry.set(key.clone(), deadline);
        }
        self.store.insert(key, value);

        self.evict();
        old_value
    }

    // == Delete ==
    /// Removes `key`. Deleting a missing key is a no-op.
    pub fn delete<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.sweep();
        self.remove_entry(key);
    }

    // == Clear ==
    /// Drops every entry immediately. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.expiry.clear();
    }

    // == Time To Live ==
    /// Returns the time left before `key` expires.
    ///
    /// - `None` if the key is absent or has no TTL
    /// - `Some(Duration::ZERO)` if it has expired but was not yet reclaimed
    ///
    /// Does not sweep, reclaim or reorder anything.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let deadline = self.expiry.deadline(key)?;
        let now = self.clock.now_ms();
        Some(Duration::from_millis(deadline.saturating_sub(now)))
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries, or None if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity.map(NonZeroUsize::get)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.store.len());
        stats
    }

    /// Returns the key that the next eviction would remove.
    pub fn eviction_candidate(&self) -> Option<&K> {
        self.store.front_key()
    }

    /// Checks that every deadline belongs to a stored key.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.expiry.keys().all(|key| self.store.contains_key(key))
    }

    // == Internal Helpers ==

    fn is_expired<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expiry.is_expired(key, self.clock.now_ms())
    }

    /// Removes `key` from both the store and the expiry index.
    fn remove_entry<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expiry.remove(key);
        self.store.remove(key)
    }

    fn expire<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.remove_entry(key).is_some() {
            self.stats.record_expiration();
            trace!("Removed expired entry on access");
        }
    }

    /// Removes the oldest entry if the store is over capacity.
    ///
    /// Runs once per write and removes at most one entry. A single insert
    /// can only overshoot a fixed capacity by one, so this is enough to
    /// restore the bound.
    fn evict(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        if self.store.len() <= capacity.get() {
            return;
        }

        if let Some((key, _)) = self.store.pop_front() {
            self.expiry.remove(&key);
            self.stats.record_eviction();
            debug!(
                entries = self.store.len(),
                capacity = capacity.get(),
                "Evicted oldest cache entry"
            );
        }
    }

    /// Probabilistic partial expiration pass.
    ///
    /// Draws `min(SWEEP_SAMPLES, |expiry index|)` keys independently and
    /// uniformly from the expiry index and removes the ones that have
    /// expired. The same key may be drawn more than once.
    fn sweep(&mut self) {
        let samples = SWEEP_SAMPLES.min(self.expiry.len());
        let mut reclaimed = 0usize;

        for _ in 0..samples {
            let Some(key) = self.expiry.sample(&mut self.rng).cloned() else {
                break;
            };
            if self.is_expired(&key) {
                self.remove_entry(&key);
                self.stats.record_expiration();
                reclaimed += 1;
            }
        }

        if reclaimed > 0 {
            debug!(reclaimed, remaining = self.expiry.len(), "Sweep reclaimed expired entries");
        }
    }
}

// == Counters ==
impl<K, V, C> KeyedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V>,
    C: Clock,
{
    // == Increment ==
    /// Adds `by` to the value at `key`, treating a missing or expired entry
    /// as `V::default()`.
    ///
    /// The read touches the key like [`get`](Self::get). The result is then
    /// written back with no TTL, so an entry that had a TTL stops expiring.
    pub fn increment(&mut self, key: K, by: V) {
        let current = self.get(&key).cloned().unwrap_or_default();
        self.set(key, current + by, Duration::ZERO);
    }

    // == Decrement ==
    /// Subtracts `by` from the value at `key`. Same read, TTL and eviction
    /// behavior as [`increment`](Self::increment).
    pub fn decrement(&mut self, key: K, by: V) {
        let current = self.get(&key).cloned().unwrap_or_default();
        self.set(key, current - by, Duration::ZERO);
    }
}

impl<K, V, C> KeyedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V> + From<u8>,
    C: Clock,
{
    // == Incr / Decr ==
    /// Increments the value at `key` by one.
    pub fn incr(&mut self, key: K) {
        self.increment(key, V::from(1));
    }

    /// Decrements the value at `key` by one.
    pub fn decr(&mut self, key: K) {
        self.decrement(key, V::from(1));
    }
}
