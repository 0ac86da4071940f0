//! Cache Capability
//!
//! The operation contract a wrapping service programs against, independent
//! of which cache handle backs it.

use std::hash::Hash;
use std::ops::{Add, Sub};
use std::time::Duration;

use crate::cache::{Clock, KeyedCache, SharedCache};

// == Cache Capability ==
/// has / get / set / increment / decrement / delete / clear.
///
/// Absence is never an error: missing or expired keys surface as `false`
/// or `None`.
pub trait CacheCapability<K, V> {
    /// Returns true if `key` holds a live entry.
    fn has(&mut self, key: &K) -> bool;

    /// Returns the live value at `key` and marks it most recently used.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Stores `value`, expiring after `ttl` unless `ttl` is zero, and
    /// returns the previous value.
    fn set(&mut self, key: K, value: V, ttl: Duration) -> Option<V>;

    /// Adds `by` to the stored value (missing counts as zero). Drops any TTL.
    fn increment(&mut self, key: K, by: V);

    /// Subtracts `by` from the stored value (missing counts as zero). Drops any TTL.
    fn decrement(&mut self, key: K, by: V);

    /// Removes `key` if present.
    fn delete(&mut self, key: &K);

    /// Removes every entry.
    fn clear(&mut self);
}

impl<K, V, C> CacheCapability<K, V> for KeyedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V>,
    C: Clock,
{
    fn has(&mut self, key: &K) -> bool {
        KeyedCache::has(self, key)
    }

    fn get(&mut self, key: &K) -> Option<V> {
        KeyedCache::get(self, key).cloned()
    }

    fn set(&mut self, key: K, value: V, ttl: Duration) -> Option<V> {
        KeyedCache::set(self, key, value, ttl)
    }

    fn increment(&mut self, key: K, by: V) {
        KeyedCache::increment(self, key, by);
    }

    fn decrement(&mut self, key: K, by: V) {
        KeyedCache::decrement(self, key, by);
    }

    fn delete(&mut self, key: &K) {
        KeyedCache::delete(self, key);
    }

    fn clear(&mut self) {
        KeyedCache::clear(self);
    }
}

impl<K, V, C> CacheCapability<K, V> for SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V>,
    C: Clock,
{
    fn has(&mut self, key: &K) -> bool {
        SharedCache::has(self, key)
    }

    fn get(&mut self, key: &K) -> Option<V> {
        SharedCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V, ttl: Duration) -> Option<V> {
        SharedCache::set(self, key, value, ttl)
    }

    fn increment(&mut self, key: K, by: V) {
        SharedCache::increment(self, key, by);
    }

    fn decrement(&mut self, key: K, by: V) {
        SharedCache::decrement(self, key, by);
    }

    fn delete(&mut self, key: &K) {
        SharedCache::delete(self, key);
    }

    fn clear(&mut self) {
        SharedCache::clear(self);
    }
}
