//! Schedule query outcomes.

use crate::topology::LineId;

/// Why a timetable query could not be answered.
///
/// Provider failures are not here: they become empty sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Station name is not in the network
    #[error("unknown station: {0}")]
    StationNotFound(String),

    /// No provider publishes timetables for this line
    #[error("schedule unsupported for {0}")]
    Unsupported(LineId),

    /// The line's provider has no API key configured
    #[error("schedule provider for {0} is not configured")]
    NotConfigured(LineId),

    /// The provider has no code for the station (on the requested line)
    #[error("no schedule code for {station}")]
    StationCodeNotFound {
        station: String,
        line: Option<LineId>,
    },
}

impl ScheduleError {
    /// Machine-readable kind for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::StationNotFound(_) => "unknown_station",
            ScheduleError::Unsupported(_) => "schedule_unsupported",
            ScheduleError::NotConfigured(_) => "not_configured",
            ScheduleError::StationCodeNotFound { .. } => "station_code_not_found",
        }
    }
}
