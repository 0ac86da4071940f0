//! Store Module
//!
//! Key-value storage ordered by insertion or last touch.

use std::borrow::Borrow;
use std::hash::Hash;

use hashlink::LinkedHashMap;

// == Store ==
/// Insertion-ordered key-value storage with move-to-back on touch.
///
/// The front of the order is the oldest inserted or least recently touched
/// key, the next eviction candidate. Insert, touch, remove and pop are O(1).
#[derive(Debug)]
pub(crate) struct Store<K, V> {
    /// Entries from oldest (front) to newest (back)
    entries: LinkedHashMap<K, V>,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: LinkedHashMap::new(),
        }
    }

    // == Insert ==
    /// Stores `value` at the newest position.
    ///
    /// An existing entry for `key` is replaced and its value returned; the
    /// key moves to the newest position either way.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.entries.remove(&key);
        self.entries.insert(key, value);
        previous
    }

    // == Touch ==
    /// Moves the key to the newest position and returns its value.
    pub fn touch<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.to_back(key).map(|value| &*value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry and returns its value. Removing a missing key is a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    // == Front ==
    /// Returns the oldest key, the next eviction candidate.
    pub fn front_key(&self) -> Option<&K> {
        self.entries.front().map(|(key, _)| key)
    }

    // == Pop Front ==
    /// Removes and returns the oldest entry.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.entries.pop_front()
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    #[cfg(test)]
    fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
