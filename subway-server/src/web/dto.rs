//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::RouteBoard;
use crate::realtime::{ArrivalRecord, TrainCategory};
use crate::schedule::{
    DayType, DirectionTimetable, ScheduleBackend, ScheduleTime, StationTimetable, TimetableEntry,
};
use crate::topology::{Direction, LineId};

/// Station search query.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Partial station name
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationSearchResult>,
}

/// A station matching a search, with the lines serving it.
#[derive(Debug, Serialize)]
pub struct StationSearchResult {
    pub name: String,
    pub lines: Vec<LineId>,
}

/// Direction query between two stations.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,

    /// Line token ("4호선", "4", "분당선"); a common line is found if unset
    pub line: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub from: String,
    pub to: String,
    pub line: LineId,
    pub direction: Direction,
}

/// Real-time board query for one station.
#[derive(Debug, Deserialize)]
pub struct ArrivalsRequest {
    pub station: String,

    /// Line token to filter by
    pub line: Option<String>,

    /// 상행, 하행, 내선 or 외선
    pub direction: Option<String>,

    /// Terminal station, with or without the trailing "행"
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    pub station: String,
    pub arrivals: Vec<ArrivalResult>,
}

/// One train on a real-time board.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    pub line: LineId,
    pub direction: Option<Direction>,
    pub destination: String,

    /// Raw provider status ("전역 출발", "3분 후 (역삼)")
    pub message: String,

    /// Seconds to arrival, 0 if unknown
    pub seconds: u32,

    /// "3분 20초", "45초", or the status text
    pub display: String,

    pub express: bool,
    pub train_no: Option<String>,
    pub last_train: bool,
}

impl ArrivalResult {
    pub fn from_record(record: &ArrivalRecord) -> Self {
        Self {
            line: record.line.clone(),
            direction: record.direction,
            destination: record.destination.clone(),
            message: record.message.clone(),
            seconds: record.seconds,
            display: record.display(),
            express: record.category == TrainCategory::Express,
            train_no: record.train_no.clone(),
            last_train: record.last_train,
        }
    }
}

/// Trip board query.
#[derive(Debug, Deserialize)]
pub struct RouteArrivalsRequest {
    pub from: String,
    pub to: String,
    pub line: Option<String>,

    /// Overrides the resolved direction
    pub direction: Option<String>,

    pub destination: Option<String>,

    /// Trains to show (default 3, capped at 20)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RouteArrivalsResponse {
    pub departure: String,
    pub arrival: String,
    pub line: LineId,
    pub direction: Direction,
    pub direction_fallback: bool,
    pub arrivals: Vec<ArrivalResult>,
}

impl RouteArrivalsResponse {
    pub fn from_board(board: &RouteBoard) -> Self {
        Self {
            departure: board.departure.clone(),
            arrival: board.arrival.clone(),
            line: board.line.clone(),
            direction: board.direction,
            direction_fallback: board.direction_fallback,
            arrivals: board.arrivals.iter().map(ArrivalResult::from_record).collect(),
        }
    }
}

/// Timetable query.
#[derive(Debug, Deserialize)]
pub struct TimetableRequest {
    pub station: String,
    pub line: Option<String>,
    pub direction: Option<String>,

    /// weekday, saturday or holiday (default: today in Seoul)
    pub day: Option<String>,

    /// Upcoming trains per section (default 5, capped at 50)
    pub upcoming: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub station: String,
    pub line: LineId,
    pub day: DayType,
    pub day_label: String,
    pub backend: ScheduleBackend,

    /// Direction and destination are unavailable
    pub degraded: bool,

    pub sections: Vec<SectionResult>,
}

impl TimetableResponse {
    /// Summarize `table` with the trains departing at or after `now`.
    pub fn from_timetable(table: &StationTimetable, now: ScheduleTime, upcoming: usize) -> Self {
        Self {
            station: table.station.clone(),
            line: table.line.clone(),
            day: table.day,
            day_label: table.day.label().to_string(),
            backend: table.backend,
            degraded: table.degraded,
            sections: table
                .sections
                .iter()
                .map(|s| SectionResult::from_section(s, now, upcoming))
                .collect(),
        }
    }
}

/// One direction of a timetable.
#[derive(Debug, Serialize)]
pub struct SectionResult {
    pub direction: Option<Direction>,
    pub label: String,

    /// Trains in the full timetable; 0 means no data
    pub total: usize,

    pub first: Option<EntryResult>,
    pub last: Option<EntryResult>,

    /// Empty when service has ended for the day
    pub upcoming: Vec<EntryResult>,
}

impl SectionResult {
    pub fn from_section(section: &DirectionTimetable, now: ScheduleTime, upcoming: usize) -> Self {
        let first_last = section.first_last();
        Self {
            direction: section.direction,
            label: section.label.clone(),
            total: section.entries.len(),
            first: first_last.map(|(first, _)| EntryResult::from_entry(first)),
            last: first_last.map(|(_, last)| EntryResult::from_entry(last)),
            upcoming: section
                .upcoming(now, upcoming)
                .into_iter()
                .map(EntryResult::from_entry)
                .collect(),
        }
    }
}

/// A scheduled train.
#[derive(Debug, Serialize)]
pub struct EntryResult {
    pub train_no: String,
    pub destination: String,

    /// HH:MM:SS
    pub departure: ScheduleTime,

    /// HH:MM
    pub departure_display: String,

    pub express: bool,
}

impl EntryResult {
    pub fn from_entry(entry: &TimetableEntry) -> Self {
        Self {
            train_no: entry.train_no.clone(),
            destination: entry.destination.clone(),
            departure: entry.departure,
            departure_display: entry.departure.hhmm(),
            express: entry.express,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Machine-readable error kind
    pub kind: String,

    /// Station names close to an unknown one
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    /// Lines serving the station when the requested one does not
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_lines: Vec<LineId>,
}
