//! Route resolution outcomes.

use crate::topology::LineId;

/// Why a route query could not be answered.
///
/// All of these are recoverable: the caller turns them into a specific
/// message for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Station name is not in the network, even after normalization
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// Line token does not name a line
    #[error("unknown line: {0}")]
    UnknownLine(String),

    /// Station exists but the line does not serve it
    #[error("{station} is not on {line}")]
    StationNotOnLine { station: String, line: LineId },

    /// No single line serves both stations; a transfer is needed
    #[error("no common line between {from} and {to}")]
    NoCommonLine { from: String, to: String },

    /// Both stations are on the line but no single-direction trip joins them
    #[error("no direction from {from} to {to} on {line}")]
    NoDirection {
        from: String,
        to: String,
        line: LineId,
    },
}

impl ResolveError {
    /// Machine-readable kind for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UnknownStation(_) => "unknown_station",
            ResolveError::UnknownLine(_) => "unknown_line",
            ResolveError::StationNotOnLine { .. } => "station_not_on_line",
            ResolveError::NoCommonLine { .. } => "no_common_line",
            ResolveError::NoDirection { .. } => "no_direction",
        }
    }
}
