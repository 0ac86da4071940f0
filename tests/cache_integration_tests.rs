//! Integration Tests for the public cache API
//!
//! Exercises the cache the way a wrapping service would: through the crate
//! root re-exports, the capability trait and the shared handle.

use std::sync::Once;
use std::time::Duration;

use local_cache::{
    CacheBuilder, CacheCapability, CacheError, Config, KeyedCache, ManualClock, SharedCache,
};
use serde_json::Value;

// == Helper Functions ==

static TRACING: Once = Once::new();

/// Surfaces cache logs when run with `RUST_LOG=local_cache=debug`.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn create_test_cache(max_entries: usize) -> (KeyedCache<String, i64, ManualClock>, ManualClock) {
    init_tracing();
    let clock = ManualClock::new(1_700_000_000_000);
    let cache = CacheBuilder::new()
        .max_entries(max_entries)
        .seed(2024)
        .clock(clock.clone())
        .build();
    (cache, clock)
}

fn key(name: &str) -> String {
    name.to_string()
}

// == Presence and Absence ==

#[test]
fn test_unknown_key_is_absent() {
    let (mut cache, _) = create_test_cache(0);

    assert!(!cache.has("never-set"));
    assert_eq!(cache.get("never-set"), None);
}

#[test]
fn test_value_without_ttl_persists() {
    let (mut cache, clock) = create_test_cache(0);

    cache.set(key("config"), 7, Duration::ZERO);
    for _ in 0..10 {
        clock.advance(Duration::from_secs(86_400));
        assert!(cache.has("config"));
        assert_eq!(cache.get("config"), Some(&7));
    }
}

// == TTL ==

#[test]
fn test_first_access_after_deadline_is_absent() {
    let (mut cache, clock) = create_test_cache(0);

    cache.set(key("session"), 1, Duration::from_secs(30));
    assert!(cache.has("session"));

    clock.advance(Duration::from_secs(31));
    assert!(!cache.has("session"));
    assert_eq!(cache.get("session"), None);
}

#[test]
fn test_expired_entries_are_reclaimed_without_direct_access() {
    let (mut cache, clock) = create_test_cache(0);

    for i in 0..20 {
        cache.set(format!("short{i}"), i, Duration::from_secs(1));
    }
    cache.set(key("anchor"), 0, Duration::ZERO);
    clock.advance(Duration::from_secs(5));

    // Each call samples up to three TTL keys; 20 stale keys drain quickly
    for _ in 0..500 {
        cache.has("anchor");
    }

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().expirations, 20);
}

// == Capacity and Recency ==

#[test]
fn test_capacity_never_exceeded() {
    let (mut cache, _) = create_test_cache(5);

    for i in 0..50 {
        cache.set(format!("k{i}"), i, Duration::ZERO);
        assert!(cache.len() <= 5);
    }
    assert_eq!(cache.stats().evictions, 45);
}

#[test]
fn test_read_protects_from_eviction() {
    let (mut cache, _) = create_test_cache(2);

    cache.set(key("A"), 1, Duration::ZERO);
    cache.set(key("B"), 2, Duration::ZERO);
    assert_eq!(cache.get("A"), Some(&1));
    cache.set(key("C"), 3, Duration::ZERO);

    assert!(cache.has("A"));
    assert!(!cache.has("B"));
    assert!(cache.has("C"));
}

// == Delete / Clear / Overwrite ==

#[test]
fn test_delete_then_has_is_false() {
    let (mut cache, _) = create_test_cache(0);

    cache.set(key("k"), 1, Duration::ZERO);
    cache.delete("k");
    assert!(!cache.has("k"));
}

#[test]
fn test_clear_empties_everything() {
    let (mut cache, _) = create_test_cache(0);

    let keys: Vec<String> = (0..10).map(|i| format!("k{i}")).collect();
    for (i, k) in keys.iter().enumerate() {
        let ttl = if i % 2 == 0 { Duration::ZERO } else { Duration::from_secs(60) };
        cache.set(k.clone(), i as i64, ttl);
    }

    cache.clear();

    assert!(cache.is_empty());
    for k in &keys {
        assert!(!cache.has(k));
    }
}

#[test]
fn test_set_returns_old_value() {
    let (mut cache, _) = create_test_cache(0);

    cache.set(key("k"), 1, Duration::ZERO);
    let old = cache.set(key("k"), 2, Duration::ZERO);

    assert_eq!(old, Some(1));
    assert_eq!(cache.get("k"), Some(&2));
}

// == Counters ==

#[test]
fn test_increment_scenario() {
    let (mut cache, _) = create_test_cache(0);

    cache.set(key("x"), 10, Duration::ZERO);
    cache.increment(key("x"), 5);

    assert_eq!(cache.get("x"), Some(&15));
}

#[test]
fn test_increment_makes_ttl_entry_permanent() {
    let (mut cache, clock) = create_test_cache(0);

    cache.set(key("x"), 10, Duration::from_secs(1));
    cache.increment(key("x"), 5);
    clock.advance(Duration::from_secs(60));

    assert_eq!(cache.get("x"), Some(&15));
}

#[test]
fn test_decrement_below_zero() {
    let (mut cache, _) = create_test_cache(0);

    cache.decrement(key("credits"), 3);
    cache.decrement(key("credits"), 2);

    assert_eq!(cache.get("credits"), Some(&-5));
}

// == Capability Contract ==

fn record_visit<C: CacheCapability<String, i64>>(cache: &mut C, page: &str) -> i64 {
    let page = page.to_string();
    cache.increment(page.clone(), 1);
    cache.get(&page).unwrap_or_default()
}

#[test]
fn test_capability_is_handle_agnostic() {
    let (mut keyed, _) = create_test_cache(0);
    let mut shared = SharedCache::new(KeyedCache::<String, i64>::unbounded());

    for _ in 0..3 {
        record_visit(&mut keyed, "/home");
        record_visit(&mut shared, "/home");
    }

    assert_eq!(record_visit(&mut keyed, "/home"), 4);
    assert_eq!(record_visit(&mut shared, "/home"), 4);
}

// == Configuration ==

#[test]
fn test_cache_from_env_config() {
    std::env::set_var("CACHE_MAX_ENTRIES", "3");
    std::env::set_var("CACHE_RNG_SEED", "11");

    let config = Config::try_from_env().unwrap();
    assert_eq!(config.max_entries, 3);
    assert_eq!(config.rng_seed, Some(11));

    let mut cache: KeyedCache<String, i64> = KeyedCache::from_config(&config);
    for i in 0..10 {
        cache.set(format!("k{i}"), i, Duration::ZERO);
    }
    assert_eq!(cache.len(), 3);

    std::env::set_var("CACHE_MAX_ENTRIES", "plenty");
    assert!(matches!(
        Config::try_from_env(),
        Err(CacheError::InvalidConfig { var: "CACHE_MAX_ENTRIES", .. })
    ));
    assert_eq!(Config::from_env().max_entries, 0);

    std::env::remove_var("CACHE_MAX_ENTRIES");
    std::env::remove_var("CACHE_RNG_SEED");
}

// == Statistics ==

#[test]
fn test_stats_serialize_to_json() {
    let (mut cache, _) = create_test_cache(1);

    cache.set(key("a"), 1, Duration::ZERO);
    cache.get("a");
    cache.get("b");
    cache.set(key("b"), 2, Duration::ZERO);

    let stats = serde_json::to_value(cache.stats()).unwrap();
    assert_eq!(stats["hits"], Value::from(1));
    assert_eq!(stats["misses"], Value::from(1));
    assert_eq!(stats["evictions"], Value::from(1));
    assert_eq!(stats["expirations"], Value::from(0));
    assert_eq!(stats["total_entries"], Value::from(1));
}
