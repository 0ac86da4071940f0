//! Local Cache - an in-process key-value cache
//!
//! Provides per-entry TTL with probabilistic lazy expiration and
//! single-step eviction of the oldest entry when a capacity is set.

pub mod cache;
pub mod capability;
pub mod config;
pub mod error;

pub use cache::{
    CacheBuilder, CacheStats, Clock, KeyedCache, ManualClock, SharedCache, SystemClock,
};
pub use capability::CacheCapability;
pub use config::Config;
pub use error::{CacheError, Result};
