//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Environment variable holding the maximum entry count
pub const MAX_ENTRIES_VAR: &str = "CACHE_MAX_ENTRIES";
/// Environment variable holding the sweep RNG seed
pub const RNG_SEED_VAR: &str = "CACHE_RNG_SEED";

/// Cache construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Maximum number of entries, 0 = unbounded
    pub max_entries: usize,
    /// Seed for the expiry sweep's sampling, None = seeded from entropy
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to defaults; an unparsable
    /// value is logged.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 0, unbounded)
    /// - `CACHE_RNG_SEED` - Sweep sampling seed (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from environment variables, rejecting values that
    /// do not parse.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_entries: lenient(parse_var(&lookup, MAX_ENTRIES_VAR))
                .unwrap_or(defaults.max_entries),
            rng_seed: lenient(parse_var(&lookup, RNG_SEED_VAR)).or(defaults.rng_seed),
        }
    }

    pub(crate) fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_entries: parse_var(&lookup, MAX_ENTRIES_VAR)?.unwrap_or(defaults.max_entries),
            rng_seed: parse_var(&lookup, RNG_SEED_VAR)?.or(defaults.rng_seed),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => {
            let parsed = raw.trim().parse();
            match parsed {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(CacheError::InvalidConfig { var, value: raw }),
            }
        }
    }
}

fn lenient<T>(parsed: Result<Option<T>>) -> Option<T> {
    parsed.unwrap_or_else(|err| {
        warn!("{err}, using default");
        None
    })
}
