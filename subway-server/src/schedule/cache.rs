//! Station-code cache for the full-schedule provider.
//!
//! Station codes never change while the process runs, so entries are kept
//! for its lifetime with no TTL and no eviction. Only successful lookups
//! are stored.

use moka::future::Cache as MokaCache;

use crate::topology::LineId;

/// Lookup key: station name and the optional line filter the caller used.
type CodeKey = (String, Option<LineId>);

/// A resolved station code and the line it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCode {
    pub code: String,
    pub line: LineId,
}

/// Shared, append-only station-code cache.
#[derive(Clone)]
pub struct StationCodeCache {
    codes: MokaCache<CodeKey, StationCode>,
}

impl StationCodeCache {
    pub fn new() -> Self {
        Self {
            codes: MokaCache::builder().build(),
        }
    }

    pub async fn get(&self, station: &str, line: Option<&LineId>) -> Option<StationCode> {
        self.codes
            .get(&(station.to_string(), line.cloned()))
            .await
    }

    /// Record a lookup result. An unfiltered lookup is also recorded under
    /// the line it resolved to.
    pub async fn insert(&self, station: &str, line: Option<&LineId>, code: StationCode) {
        if line.is_none() {
            self.codes
                .insert((station.to_string(), Some(code.line.clone())), code.clone())
                .await;
        }
        self.codes
            .insert((station.to_string(), line.cloned()), code)
            .await;
    }

    pub async fn entry_count(&self) -> u64 {
        self.codes.run_pending_tasks().await;
        self.codes.entry_count()
    }
}

impl Default for StationCodeCache {
    fn default() -> Self {
        Self::new()
    }
}
