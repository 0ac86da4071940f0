//! Cache Builder Module

use std::hash::Hash;
use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cache::{Clock, KeyedCache, SystemClock};
use crate::config::Config;

// == Cache Builder ==
/// Builder for configuring a [`KeyedCache`].
///
/// # Example
///
/// ```
/// use local_cache::{CacheBuilder, KeyedCache, ManualClock};
///
/// let cache: KeyedCache<String, u32, ManualClock> = CacheBuilder::new()
///     .max_entries(1_000)
///     .seed(42)
///     .clock(ManualClock::new(0))
///     .build();
/// assert_eq!(cache.capacity(), Some(1_000));
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder<C = SystemClock> {
    max_entries: usize,
    seed: Option<u64>,
    clock: C,
}

impl CacheBuilder<SystemClock> {
    // == Constructor ==
    /// Create a builder for an unbounded cache on the system clock.
    pub fn new() -> Self {
        Self {
            max_entries: 0,
            seed: None,
            clock: SystemClock,
        }
    }

    // == From Config ==
    /// Create a builder carrying the settings of a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let builder = Self::new().max_entries(config.max_entries);
        match config.rng_seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }
}

impl<C: Clock> CacheBuilder<C> {
    // == Max Entries ==
    /// Set the maximum number of entries.
    ///
    /// Default: 0 (unbounded)
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    // == Seed ==
    /// Seed the sweep's random sampling so runs are reproducible.
    ///
    /// Default: seeded from OS entropy
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // == Clock ==
    /// Replace the time source.
    pub fn clock<C2: Clock>(self, clock: C2) -> CacheBuilder<C2> {
        CacheBuilder {
            max_entries: self.max_entries,
            seed: self.seed,
            clock,
        }
    }

    // == Build ==
    /// Build the cache with the configured settings.
    pub fn build<K, V>(self) -> KeyedCache<K, V, C>
    where
        K: Hash + Eq + Clone,
    {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        KeyedCache::from_parts(NonZeroUsize::new(self.max_entries), self.clock, rng)
    }
}

impl Default for CacheBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::time::Duration;

    #[test]
    fn test_builder_default() {
        let cache: KeyedCache<String, i64> = CacheBuilder::default().build();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn test_builder_with_max_entries() {
        let cache: KeyedCache<String, i64> = CacheBuilder::new().max_entries(32).build();
        assert_eq!(cache.capacity(), Some(32));
    }

    #[test]
    fn test_builder_from_config() {
        let config = Config {
            max_entries: 5,
            rng_seed: Some(1),
        };
        let cache: KeyedCache<String, i64> = CacheBuilder::from_config(&config).build();
        assert_eq!(cache.capacity(), Some(5));
    }

    #[test]
    fn test_builder_custom_clock() {
        let clock = ManualClock::new(0);
        let mut cache: KeyedCache<String, i64, ManualClock> = CacheBuilder::new()
            .max_entries(4)
            .clock(clock.clone())
            .build();

        cache.set("k".to_string(), 1, Duration::from_secs(1));
        clock.advance(Duration::from_secs(1));
        assert!(!cache.has("k"));
    }
}
