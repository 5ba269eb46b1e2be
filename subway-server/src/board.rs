//! Arrival board for a trip between two stations.
//!
//! Resolves the line and direction of travel, then narrows the departure
//! station's real-time board to trains that actually take the rider to the
//! arrival station.

use serde::Serialize;
use tracing::debug;

use crate::realtime::{ArrivalRecord, ArrivalSource, arrivals_at, filter};
use crate::route::{ResolveError, RouteResolver};
use crate::topology::{Direction, LineId};

/// Trains shown per trip by default.
pub const DEFAULT_LIMIT: usize = 3;

/// A trip query with optional overrides.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub departure: String,
    pub arrival: String,
    /// Line to travel on; a common line is found when unset
    pub line: Option<LineId>,
    /// Replaces the resolved direction
    pub direction: Option<Direction>,
    /// Only trains bound for this terminal ("당고개" or "당고개행")
    pub destination: Option<String>,
    pub limit: usize,
}

impl RouteQuery {
    pub fn new(departure: impl Into<String>, arrival: impl Into<String>) -> Self {
        Self {
            departure: departure.into(),
            arrival: arrival.into(),
            line: None,
            direction: None,
            destination: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_line(mut self, line: LineId) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Upcoming trains for a trip.
#[derive(Debug, Clone, Serialize)]
pub struct RouteBoard {
    pub departure: String,
    pub arrival: String,
    pub line: LineId,
    pub direction: Direction,
    /// No train on the line carried a usable direction, so the board shows
    /// every train on the line instead.
    pub direction_fallback: bool,
    pub arrivals: Vec<ArrivalRecord>,
}

/// Build the board for `query`.
///
/// Route resolution failures are returned; provider failures give an empty
/// board. Filters apply in order: line, direction (skipped if it would
/// remove every train), destination, then reachability of the arrival
/// station.
pub async fn route_arrivals<S: ArrivalSource>(
    resolver: &RouteResolver,
    source: &S,
    query: &RouteQuery,
) -> Result<RouteBoard, ResolveError> {
    let route = resolver.route(&query.departure, &query.arrival, query.line.as_ref())?;
    let direction = query.direction.unwrap_or(route.direction);

    let network = resolver.network();
    let departure = network.normalize_station_name(&query.departure);
    let arrival = network.normalize_station_name(&query.arrival);

    let records = arrivals_at(source, &departure).await;
    let on_line = filter::by_line(&records, &route.line);
    let heading = filter::by_direction(&on_line, direction);
    let direction_fallback = heading.is_empty() && !on_line.is_empty();
    let mut arrivals = if direction_fallback { on_line } else { heading };

    if let Some(destination) = &query.destination {
        arrivals = filter::by_destination(&arrivals, filter::destination_token(destination));
    }

    arrivals.retain(|record| {
        resolver.train_reaches_station(
            &route.line,
            Some(&departure),
            &arrival,
            &record.destination,
            direction,
        )
    });
    arrivals.truncate(query.limit);

    debug!(
        %departure,
        %arrival,
        line = %route.line,
        %direction,
        count = arrivals.len(),
        "route board"
    );

    Ok(RouteBoard {
        departure,
        arrival,
        line: route.line,
        direction,
        direction_fallback,
        arrivals,
    })
}
