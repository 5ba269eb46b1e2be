//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedRealtimeClient};
use crate::config::ServerConfig;
use crate::provider::ProviderError;
use crate::realtime::{RealtimeClient, RealtimeConfig};
use crate::route::RouteResolver;
use crate::schedule::{
    FullScheduleClient, FullScheduleConfig, LimitedScheduleClient, LimitedScheduleConfig,
    ScheduleAggregator,
};
use crate::topology::Network;

/// Real-time boards behind the short-lived cache.
pub type ArrivalBoards = CachedRealtimeClient<RealtimeClient>;

/// Timetables from both schedule providers.
pub type Schedules = ScheduleAggregator<FullScheduleClient, LimitedScheduleClient>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station and line topology
    pub network: Arc<Network>,

    /// Line and direction resolution over `network`
    pub resolver: Arc<RouteResolver>,

    /// Cached real-time arrival client
    pub arrivals: Arc<ArrivalBoards>,

    /// Timetable aggregator
    pub schedules: Arc<Schedules>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: Arc<Network>, arrivals: ArrivalBoards, schedules: Schedules) -> Self {
        Self {
            resolver: Arc::new(RouteResolver::new(Arc::clone(&network))),
            network,
            arrivals: Arc::new(arrivals),
            schedules: Arc::new(schedules),
        }
    }

    /// Build every provider client from `config`.
    ///
    /// The limited-schedule client is only created when its key is set.
    pub fn from_config(config: &ServerConfig, network: Arc<Network>) -> Result<Self, ProviderError> {
        let realtime = RealtimeClient::new(RealtimeConfig::new(&config.seoul_api_key))?;
        let arrivals = CachedRealtimeClient::new(realtime, &CacheConfig::default());

        let full = FullScheduleClient::new(FullScheduleConfig::new(&config.seoul_api_key))?;
        let limited = config
            .kric_api_key
            .as_ref()
            .map(|key| LimitedScheduleClient::new(LimitedScheduleConfig::new(key)))
            .transpose()?;
        let schedules = ScheduleAggregator::new(Arc::clone(&network), full, limited);

        Ok(Self::new(network, arrivals, schedules))
    }
}
