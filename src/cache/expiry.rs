//! Expiry Index Module
//!
//! Absolute deadlines for keys that carry a TTL.

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;
use rand::Rng;

// == Expiry Index ==
/// Maps TTL-bearing keys to their absolute deadline (Unix milliseconds).
///
/// Keys without a TTL never appear here. Backed by an `IndexMap` so a key
/// can be drawn uniformly at random in O(1); removal uses `swap_remove`
/// because the order of this index carries no meaning.
#[derive(Debug)]
pub(crate) struct ExpiryIndex<K> {
    deadlines: IndexMap<K, u64>,
}

impl<K> ExpiryIndex<K>
where
    K: Hash + Eq,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            deadlines: IndexMap::new(),
        }
    }

    // == Set ==
    /// Records (or replaces) the deadline for `key`.
    pub fn set(&mut self, key: K, deadline_ms: u64) {
        self.deadlines.insert(key, deadline_ms);
    }

    // == Deadline ==
    pub fn deadline<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.get(key).copied()
    }

    // == Is Expired ==
    /// Checks whether `key` is past its deadline at `now_ms`.
    ///
    /// Boundary condition: a deadline equal to `now_ms` counts as expired.
    /// Keys without a deadline never expire.
    pub fn is_expired<Q>(&self, key: &Q, now_ms: u64) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadline(key).is_some_and(|deadline| deadline <= now_ms)
    }

    // == Remove ==
    /// Drops the deadline for `key`, returning it if one was set.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.swap_remove(key)
    }

    // == Sample ==
    /// Picks one key uniformly at random, or None if the index is empty.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&K> {
        if self.deadlines.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.deadlines.len());
        self.deadlines.get_index(index).map(|(key, _)| key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    #[cfg(test)]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.deadlines.contains_key(key)
    }

    /// Iterates the keys that carry a deadline, in no meaningful order.
    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.deadlines.keys()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

impl<K> Default for ExpiryIndex<K>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}
