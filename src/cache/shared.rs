//! Shared Cache Module
//!
//! A cloneable, mutex-guarded handle for callers on several threads.

use std::borrow::Borrow;
use std::hash::Hash;
use std::ops::{Add, Sub};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{CacheStats, Clock, KeyedCache, SystemClock};

// == Shared Cache ==
/// Thread-safe handle to a [`KeyedCache`].
///
/// One mutex guards the whole cache and every call holds it for the full
/// operation, so each call observes and leaves a consistent state. Clones
/// share the same cache.
#[derive(Debug)]
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<KeyedCache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    // == Constructor ==
    /// Wraps an existing cache.
    pub fn new(cache: KeyedCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    // Operations never leave the cache half-updated, so a guard poisoned by a
    // panicking caller is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, KeyedCache<K, V, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with<R>(&self, f: impl FnOnce(&mut KeyedCache<K, V, C>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().has(key)
    }

    /// Returns a clone of the live value at `key`, touching it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: K, value: V, ttl: Duration) -> Option<V> {
        self.lock().set(key, value, ttl)
    }

    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().delete(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V>,
    C: Clock,
{
    /// Read-modify-write under a single lock acquisition.
    pub fn increment(&self, key: K, by: V) {
        self.lock().increment(key, by);
    }

    pub fn decrement(&self, key: K, by: V) {
        self.lock().decrement(key, by);
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone + Default + Add<Output = V> + Sub<Output = V> + From<u8>,
    C: Clock,
{
    pub fn incr(&self, key: K) {
        self.lock().incr(key);
    }

    pub fn decr(&self, key: K) {
        self.lock().decr(key);
    }
}

impl<K, V, C> From<KeyedCache<K, V, C>> for SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    fn from(cache: KeyedCache<K, V, C>) -> Self {
        Self::new(cache)
    }
}
