//! Common-line, direction and reachability queries.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::topology::{Direction, Line, LineId, Network};

use super::error::ResolveError;
use super::path::{Position, path_reaches, path_sense, position_pairs, positions};

/// A line and the direction to ride it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub line: LineId,
    pub direction: Direction,
}

/// Answers route questions against a shared [`Network`].
#[derive(Debug, Clone)]
pub struct RouteResolver {
    network: Arc<Network>,
}

impl RouteResolver {
    pub fn new(network: Arc<Network>) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Resolve a route on `line` if given, otherwise on a common line.
    pub fn route(&self, from: &str, to: &str, line: Option<&LineId>) -> Result<Route, ResolveError> {
        match line {
            Some(line) => Ok(Route {
                line: line.clone(),
                direction: self.find_direction(from, to, line)?,
            }),
            None => self.find_common_line(from, to),
        }
    }

    /// Find a line serving both stations and the direction from `from`.
    ///
    /// When several lines qualify they are tried in dataset rank order and
    /// the first with a defined direction wins. If none has one, the error
    /// names the top-ranked candidate.
    pub fn find_common_line(&self, from: &str, to: &str) -> Result<Route, ResolveError> {
        let from = self.known_station(from)?;
        let to = self.known_station(to)?;

        let to_lines = self.network.station_lines(&to);
        let candidates: Vec<LineId> = self
            .network
            .station_lines(&from)
            .into_iter()
            .filter(|line| to_lines.contains(line))
            .collect();

        let Some(top) = candidates.first() else {
            return Err(ResolveError::NoCommonLine { from, to });
        };

        for line in &candidates {
            match self.find_direction(&from, &to, line) {
                Ok(direction) => {
                    return Ok(Route {
                        line: line.clone(),
                        direction,
                    });
                }
                Err(e) => debug!(%line, error = %e, "candidate line has no direction"),
            }
        }

        Err(ResolveError::NoDirection {
            from,
            to,
            line: top.clone(),
        })
    }

    /// Direction of travel from `from` to `to` on `line`.
    pub fn find_direction(
        &self,
        from: &str,
        to: &str,
        line: &LineId,
    ) -> Result<Direction, ResolveError> {
        let line = self
            .network
            .line(line)
            .ok_or_else(|| ResolveError::UnknownLine(line.to_string()))?;
        let from = self.station_on(from, line)?;
        let to = self.station_on(to, line)?;

        position_pairs(line, &from, &to)
            .into_iter()
            .find_map(|(a, b)| path_sense(line, a, b))
            .map(|sense| line.scheme().label(sense))
            .ok_or_else(|| ResolveError::NoDirection {
                from,
                to,
                line: line.id().clone(),
            })
    }

    /// Whether a train bound for `destination`, running `direction` on
    /// `line` and currently at or approaching `position`, calls at
    /// `arrival`.
    ///
    /// On a loop line every station lies ahead eventually, so the answer
    /// there depends on where the train is: `arrival` must come no later
    /// than `destination` counted from `position`. Without a position a loop
    /// train counts as reaching.
    ///
    /// Anything that cannot be resolved against the topology (unknown line,
    /// station or destination, or a label from the other direction scheme)
    /// counts as reachable, so arrivals are never hidden because of a naming
    /// mismatch in provider data.
    pub fn train_reaches_station(
        &self,
        line: &LineId,
        position: Option<&str>,
        arrival: &str,
        destination: &str,
        direction: Direction,
    ) -> bool {
        let Some(line) = self.network.line(line) else {
            return true;
        };
        let Some(sense) = line.scheme().sense_of(direction) else {
            return true;
        };
        let arrival = self.network.normalize_station_name(arrival);
        let destination = self.network.normalize_station_name(destination);
        if arrival == destination || !line.contains(&arrival) || !line.contains(&destination) {
            return true;
        }

        let origins: Vec<Option<Position>> = match position {
            Some(station) => {
                let found = positions(line, &self.network.normalize_station_name(station));
                if found.is_empty() {
                    vec![None]
                } else {
                    found.into_iter().map(Some).collect()
                }
            }
            None => vec![None],
        };

        position_pairs(line, &arrival, &destination)
            .into_iter()
            .any(|(a, d)| {
                origins
                    .iter()
                    .any(|&origin| path_reaches(line, origin, a, d, sense))
            })
    }

    fn known_station(&self, name: &str) -> Result<String, ResolveError> {
        let name = self.network.normalize_station_name(name);
        match self.network.station(&name) {
            Some(_) => Ok(name),
            None => Err(ResolveError::UnknownStation(name)),
        }
    }

    fn station_on(&self, name: &str, line: &Line) -> Result<String, ResolveError> {
        let name = self.known_station(name)?;
        if line.contains(&name) {
            Ok(name)
        } else {
            Err(ResolveError::StationNotOnLine {
                station: name,
                line: line.id().clone(),
            })
        }
    }
}
