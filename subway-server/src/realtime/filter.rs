//! Arrival list filters.

use crate::topology::{Direction, LineId};

use super::record::ArrivalRecord;

/// Records whose line id contains `line`.
///
/// Substring rather than equality so "1호선" also catches provider ids that
/// decorate the line name.
pub fn by_line(records: &[ArrivalRecord], line: &LineId) -> Vec<ArrivalRecord> {
    records
        .iter()
        .filter(|r| r.line.as_str().contains(line.as_str()))
        .cloned()
        .collect()
}

/// Records travelling in `direction`.
pub fn by_direction(records: &[ArrivalRecord], direction: Direction) -> Vec<ArrivalRecord> {
    records
        .iter()
        .filter(|r| r.direction == Some(direction))
        .cloned()
        .collect()
}

/// Records terminating at `destination`.
pub fn by_destination(records: &[ArrivalRecord], destination: &str) -> Vec<ArrivalRecord> {
    let destination = destination.trim();
    records
        .iter()
        .filter(|r| r.destination == destination)
        .cloned()
        .collect()
}

/// Strip the "행" suffix users write on destinations ("당고개행").
pub fn destination_token(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.strip_suffix('행') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => raw,
    }
}
