//! Heuristic ordering of arrivals.
//!
//! The provider gives a seconds estimate only for trains close enough to be
//! timed. Everything else carries a status text such as "3번째 전역" that
//! we turn into an approximate time at two minutes per station.

use std::sync::LazyLock;

use regex::Regex;

use super::record::ArrivalRecord;

/// Approximate seconds between adjacent stations.
pub const SECONDS_PER_STATION: u32 = 120;

/// Station count used when the status text says nothing useful.
const UNKNOWN_STATIONS: u32 = 999;

static STATIONS_AWAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)번째\s*전역").expect("valid regex"));

/// Estimated stations between the train and the queried station.
fn stations_away(message: &str) -> u32 {
    if let Some(caps) = STATIONS_AWAY.captures(message)
        && let Ok(n) = caps[1].parse::<u32>()
    {
        return n;
    }
    if message.contains("전역 출발") || message.contains("전역 도착") {
        return 1;
    }
    if message.contains("당역 진입") || message.contains("도착") {
        return 0;
    }
    UNKNOWN_STATIONS
}

/// Sort key for an arrival: the seconds estimate when positive, otherwise
/// the station distance read from `message` at [`SECONDS_PER_STATION`] each.
///
/// # Examples
///
/// ```
/// use subway_server::realtime::rank_key;
///
/// assert_eq!(rank_key(45, "전역 출발"), 45);
/// assert_eq!(rank_key(0, "3번째 전역"), 360);
/// assert_eq!(rank_key(0, "전역 도착"), 120);
/// assert_eq!(rank_key(0, "당역 진입"), 0);
/// ```
pub fn rank_key(seconds: u32, message: &str) -> u32 {
    if seconds > 0 {
        return seconds;
    }
    stations_away(message).saturating_mul(SECONDS_PER_STATION)
}

/// Sort ascending by rank key. Stable, so equal keys keep provider order.
pub fn sort_by_rank(records: &mut [ArrivalRecord]) {
    records.sort_by_key(ArrivalRecord::rank_key);
}
