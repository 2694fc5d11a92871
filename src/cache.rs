//! In-memory caching using moka
//!
//! Holds saved quote snapshots until they expire. Expiry is the quote's
//! validity window: an expired quote must be re-priced.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::pricing::services::QuoteSnapshot;

/// Application cache holding quote snapshots
#[derive(Clone)]
pub struct QuoteCache {
    /// Saved quotes (quote id -> snapshot)
    pub quotes: Cache<Uuid, Arc<QuoteSnapshot>>,
    ttl: Duration,
}

impl QuoteCache {
    /// Create a new cache with the given capacity and quote lifetime
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            quotes: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    /// How long a snapshot stays retrievable
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            quotes_size: self.quotes.entry_count(),
            quote_ttl_secs: self.ttl.as_secs(),
        }
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        // 10k quotes, 24 hour validity
        Self::new(10_000, Duration::from_secs(24 * 60 * 60))
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub quotes_size: u64,
    pub quote_ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = QuoteCache::new(10, Duration::from_secs(60));
        assert_eq!(cache.stats().quotes_size, 0);
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_default_ttl() {
        let cache = QuoteCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(86_400));
        assert_eq!(cache.stats().quote_ttl_secs, 86_400);
    }
}
