//! One timetable view over two providers with disjoint line coverage.
//!
//! The full-schedule provider answers per direction with destinations; the
//! limited one returns every train at the station with neither. Which one a
//! query goes to depends on the line, and when the caller names no line, on
//! the line the full provider's station lookup resolves to.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::provider::ProviderError;
use crate::topology::{Direction, DirectionScheme, Line, LineId, Network, TopologyKind};

use super::cache::{StationCode, StationCodeCache};
use super::day_type::DayType;
use super::entry::{ScheduleTime, TimetableEntry, first_last, upcoming};
use super::error::ScheduleError;
use super::full::{FullScheduleClient, StationInfo};
use super::limited::LimitedScheduleClient;

/// Lines the full-schedule provider covers.
pub const FULL_LINES: &[&str] = &["3호선", "4호선", "6호선", "7호선", "8호선", "9호선"];

/// Lines the limited-schedule provider covers, with its line codes.
pub const LIMITED_LINES: &[(&str, &str)] = &[("1호선", "1"), ("2호선", "2")];

/// Which provider serves a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleBackend {
    Full,
    Limited,
}

impl ScheduleBackend {
    /// Provider for `line`, `None` if neither publishes its timetable.
    pub fn for_line(line: &LineId) -> Option<Self> {
        if FULL_LINES.contains(&line.as_str()) {
            Some(ScheduleBackend::Full)
        } else if limited_line_code(line).is_some() {
            Some(ScheduleBackend::Limited)
        } else {
            None
        }
    }
}

fn limited_line_code(line: &LineId) -> Option<&'static str> {
    LIMITED_LINES
        .iter()
        .find(|(id, _)| *id == line.as_str())
        .map(|(_, code)| *code)
}

/// Source of full-schedule data.
pub trait FullScheduleSource: Send + Sync {
    /// Station codes per line for `station`, in provider order.
    fn lookup_station(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<Vec<StationInfo>, ProviderError>> + Send;

    /// Ascending timetable for one direction (1 = 상행/내선, 2 = 하행/외선).
    fn fetch_timetable(
        &self,
        code: &str,
        day: DayType,
        direction_code: u8,
    ) -> impl Future<Output = Result<Vec<TimetableEntry>, ProviderError>> + Send;
}

/// Source of limited-schedule data.
pub trait LimitedScheduleSource: Send + Sync {
    /// Ascending timetable of every train at the station.
    fn fetch_timetable(
        &self,
        line_code: &str,
        station_code: &str,
        day: DayType,
    ) -> impl Future<Output = Result<Vec<TimetableEntry>, ProviderError>> + Send;
}

impl FullScheduleSource for FullScheduleClient {
    async fn lookup_station(&self, station: &str) -> Result<Vec<StationInfo>, ProviderError> {
        FullScheduleClient::lookup_station(self, station).await
    }

    async fn fetch_timetable(
        &self,
        code: &str,
        day: DayType,
        direction_code: u8,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        self.get_timetable(code, day, direction_code).await
    }
}

impl LimitedScheduleSource for LimitedScheduleClient {
    async fn fetch_timetable(
        &self,
        line_code: &str,
        station_code: &str,
        day: DayType,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        self.get_timetable(line_code, station_code, day).await
    }
}

/// Trains for one direction, or for the whole station when the provider
/// does not split by direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionTimetable {
    /// `None` for undivided limited-provider sections.
    pub direction: Option<Direction>,
    pub label: String,
    /// Ascending by departure. Empty means no data for this direction.
    pub entries: Vec<TimetableEntry>,
}

impl DirectionTimetable {
    pub fn first_last(&self) -> Option<(&TimetableEntry, &TimetableEntry)> {
        first_last(&self.entries)
    }

    pub fn upcoming(&self, now: ScheduleTime, n: usize) -> Vec<&TimetableEntry> {
        upcoming(&self.entries, now, n)
    }
}

/// A station's timetable on one line for one day type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationTimetable {
    pub station: String,
    pub line: LineId,
    pub day: DayType,
    pub backend: ScheduleBackend,
    /// Set when direction and destination are unavailable.
    pub degraded: bool,
    pub sections: Vec<DirectionTimetable>,
}

/// Routes timetable queries to the right provider and normalizes results.
pub struct ScheduleAggregator<F, L> {
    network: Arc<Network>,
    full: F,
    limited: Option<L>,
    codes: StationCodeCache,
}

impl<F: FullScheduleSource, L: LimitedScheduleSource> ScheduleAggregator<F, L> {
    /// `limited` is `None` when its provider has no key configured.
    pub fn new(network: Arc<Network>, full: F, limited: Option<L>) -> Self {
        Self {
            network,
            full,
            limited,
            codes: StationCodeCache::new(),
        }
    }

    pub fn codes(&self) -> &StationCodeCache {
        &self.codes
    }

    /// Timetable for `station`.
    ///
    /// With a `line`, unsupported lines are rejected before any provider
    /// call. Without one, the full provider's lookup picks the line and the
    /// query is redirected to the limited provider if that line is one of
    /// its lines. A `direction` restricts full-provider results to one
    /// section; it is ignored for the limited provider.
    pub async fn timetable(
        &self,
        station: &str,
        line: Option<&LineId>,
        direction: Option<Direction>,
        day: DayType,
    ) -> Result<StationTimetable, ScheduleError> {
        let backend = match line {
            Some(line) => Some(
                ScheduleBackend::for_line(line)
                    .ok_or_else(|| ScheduleError::Unsupported(line.clone()))?,
            ),
            None => None,
        };

        let station = self.network.normalize_station_name(station);
        if self.network.station(&station).is_none() {
            return Err(ScheduleError::StationNotFound(station));
        }

        match (line, backend) {
            (Some(line), Some(ScheduleBackend::Limited)) => {
                self.limited_timetable(&station, line, day).await
            }
            (Some(line), _) => {
                let code = self.station_code(&station, Some(line)).await?;
                Ok(self.full_timetable(&station, code, direction, day).await)
            }
            (None, _) => {
                let code = self.station_code(&station, None).await?;
                match ScheduleBackend::for_line(&code.line) {
                    Some(ScheduleBackend::Full) => {
                        Ok(self.full_timetable(&station, code, direction, day).await)
                    }
                    Some(ScheduleBackend::Limited) => {
                        debug!(%station, line = %code.line, "redirecting to limited provider");
                        self.limited_timetable(&station, &code.line, day).await
                    }
                    None => Err(ScheduleError::Unsupported(code.line)),
                }
            }
        }
    }

    /// Full-provider code for `station`, from cache or a lookup.
    async fn station_code(
        &self,
        station: &str,
        line: Option<&LineId>,
    ) -> Result<StationCode, ScheduleError> {
        if let Some(code) = self.codes.get(station, line).await {
            return Ok(code);
        }

        let not_found = || ScheduleError::StationCodeNotFound {
            station: station.to_string(),
            line: line.cloned(),
        };

        let infos = match self.full.lookup_station(station).await {
            Ok(infos) => infos,
            Err(e) => {
                warn!(station, error = %e, "station code lookup failed");
                return Err(not_found());
            }
        };

        let info = infos
            .into_iter()
            .find(|info| line.is_none_or(|line| &info.line == line))
            .ok_or_else(not_found)?;
        let code = StationCode {
            code: info.code,
            line: info.line,
        };
        self.codes.insert(station, line, code.clone()).await;
        Ok(code)
    }

    async fn full_timetable(
        &self,
        station: &str,
        code: StationCode,
        direction: Option<Direction>,
        day: DayType,
    ) -> StationTimetable {
        let scheme = self
            .network
            .line(&code.line)
            .map(Line::scheme)
            .unwrap_or(DirectionScheme::UpDown);
        let directions: Vec<Direction> = match direction {
            Some(direction) => vec![scheme.from_provider_code(direction.provider_code())],
            None => scheme.labels().to_vec(),
        };

        let station_code = code.code.as_str();
        let fetches = directions.into_iter().map(|direction| async move {
            let entries = match self
                .full
                .fetch_timetable(station_code, day, direction.provider_code())
                .await
            {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(station, %direction, error = %e, "timetable unavailable");
                    Vec::new()
                }
            };
            DirectionTimetable {
                direction: Some(direction),
                label: direction.label().to_string(),
                entries,
            }
        });
        let sections = join_all(fetches).await;

        StationTimetable {
            station: station.to_string(),
            line: code.line,
            day,
            backend: ScheduleBackend::Full,
            degraded: false,
            sections,
        }
    }

    async fn limited_timetable(
        &self,
        station: &str,
        line: &LineId,
        day: DayType,
    ) -> Result<StationTimetable, ScheduleError> {
        let Some(limited) = &self.limited else {
            return Err(ScheduleError::NotConfigured(line.clone()));
        };
        let line_code =
            limited_line_code(line).ok_or_else(|| ScheduleError::Unsupported(line.clone()))?;
        let station_code = self.network.limited_code(station, line).ok_or_else(|| {
            ScheduleError::StationCodeNotFound {
                station: station.to_string(),
                line: Some(line.clone()),
            }
        })?;

        let entries = match limited.fetch_timetable(line_code, station_code, day).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(station, %line, error = %e, "limited timetable unavailable");
                Vec::new()
            }
        };

        let circular = self
            .network
            .line(line)
            .is_some_and(|l| l.kind() == TopologyKind::Circular);
        let label = if circular { "순환" } else { "전방향" };

        Ok(StationTimetable {
            station: station.to_string(),
            line: line.clone(),
            day,
            backend: ScheduleBackend::Limited,
            degraded: true,
            sections: vec![DirectionTimetable {
                direction: None,
                label: label.to_string(),
                entries,
            }],
        })
    }
}
