//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration and oldest-entry
//! eviction.

mod builder;
mod clock;
mod expiry;
mod keyed;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use builder::CacheBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use keyed::KeyedCache;
pub use shared::SharedCache;
pub use stats::CacheStats;

pub(crate) use expiry::ExpiryIndex;
pub(crate) use store::Store;

// == Public Constants ==
/// Maximum number of expiry-index keys inspected by one sweep
pub const SWEEP_SAMPLES: usize = 3;
