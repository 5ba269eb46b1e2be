//! Caching layer for real-time arrival boards.
//!
//! Boards change every few seconds, so entries live only briefly. The cache
//! exists to absorb bursts: several route queries from the same departure
//! station share one provider call.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::provider::ProviderError;
use crate::realtime::{ArrivalRecord, ArrivalSource};

/// Cached board, keyed by station name.
type BoardEntry = Arc<Vec<ArrivalRecord>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            max_capacity: 1000,
        }
    }
}

/// Arrival source with a short-lived board cache in front.
///
/// Failures are not cached; the next query retries the provider.
pub struct CachedRealtimeClient<S> {
    source: S,
    boards: MokaCache<String, BoardEntry>,
}

impl<S: ArrivalSource> CachedRealtimeClient<S> {
    /// Create a new cached client.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, boards }
    }

    /// Get the board for `station`, using the cache if available.
    pub async fn get_arrivals(&self, station: &str) -> Result<BoardEntry, ProviderError> {
        let key = station.trim().to_string();

        if let Some(cached) = self.boards.get(&key).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.source.fetch_arrivals(&key).await?);
        self.boards.insert(key, entry.clone()).await;
        Ok(entry)
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of cached boards, after pending evictions are applied.
    pub async fn cache_entry_count(&self) -> u64 {
        self.boards.run_pending_tasks().await;
        self.boards.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.boards.invalidate_all();
    }
}

impl<S: ArrivalSource> ArrivalSource for CachedRealtimeClient<S> {
    async fn fetch_arrivals(&self, station: &str) -> Result<Vec<ArrivalRecord>, ProviderError> {
        Ok(self.get_arrivals(station).await?.as_ref().clone())
    }
}
