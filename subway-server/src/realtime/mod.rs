//! Real-time arrival normalization.
//!
//! The provider returns loosely-typed rows: line ids are internal numbers,
//! seconds-to-arrival is often a string and often 0, and the useful timing
//! is buried in free text. This module turns those rows into
//! [`ArrivalRecord`]s and orders them by a best-effort arrival estimate.

mod client;
mod convert;
pub mod filter;
mod rank;
mod record;
mod types;

use std::future::Future;

use tracing::warn;

use crate::provider::ProviderError;

pub use client::{RealtimeClient, RealtimeConfig};
pub use convert::{canonical_line_id, normalize_arrival, parse_seconds};
pub use rank::{SECONDS_PER_STATION, rank_key, sort_by_rank};
pub use record::{ArrivalRecord, TrainCategory};
pub use types::{ArrivalResponse, RawArrival, ResultEnvelope};

/// Anything that can produce the arrival board for a station.
///
/// Implemented by the HTTP client, the caching wrapper and test mocks.
pub trait ArrivalSource: Send + Sync {
    /// Arrivals at `station`, sorted by rank key.
    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<Vec<ArrivalRecord>, ProviderError>> + Send;
}

impl ArrivalSource for RealtimeClient {
    async fn fetch_arrivals(&self, station: &str) -> Result<Vec<ArrivalRecord>, ProviderError> {
        self.get_arrivals(station).await
    }
}

/// Arrivals at `station`, or an empty list if the provider fails.
pub async fn arrivals_at<S: ArrivalSource>(source: &S, station: &str) -> Vec<ArrivalRecord> {
    match source.fetch_arrivals(station).await {
        Ok(records) => records,
        Err(e) => {
            warn!(station, error = %e, "real-time arrivals unavailable");
            Vec::new()
        }
    }
}
