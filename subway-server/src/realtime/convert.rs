//! Conversion from provider rows to [`ArrivalRecord`]s.

use serde_json::Value;

use crate::topology::{Direction, LineId};

use super::record::{ArrivalRecord, TrainCategory};
use super::types::{RawArrival, lenient_int};

/// Provider `subwayId` to canonical line id.
const LINE_IDS: &[(&str, &str)] = &[
    ("1001", "1호선"),
    ("1002", "2호선"),
    ("1003", "3호선"),
    ("1004", "4호선"),
    ("1005", "5호선"),
    ("1006", "6호선"),
    ("1007", "7호선"),
    ("1008", "8호선"),
    ("1009", "9호선"),
    ("1032", "GTX-A"),
    ("1061", "중앙선"),
    ("1063", "경의중앙선"),
    ("1065", "공항철도"),
    ("1067", "경춘선"),
    ("1075", "수인분당선"),
    ("1077", "신분당선"),
    ("1081", "경강선"),
    ("1092", "우이신설선"),
    ("1093", "서해선"),
];

/// Canonical line id for a provider line id. Unknown ids pass through.
pub fn canonical_line_id(subway_id: &str) -> LineId {
    let subway_id = subway_id.trim();
    LINE_IDS
        .iter()
        .find(|(id, _)| *id == subway_id)
        .map(|(_, line)| LineId::new(*line))
        .unwrap_or_else(|| LineId::new(subway_id))
}

/// Seconds-to-arrival from the provider field. Anything that is not a
/// non-negative integer counts as unknown (0).
pub fn parse_seconds(value: &Value) -> u32 {
    lenient_int(value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Normalize one provider row. `queried` fills in a missing station name.
pub fn normalize_arrival(raw: &RawArrival, queried: &str) -> ArrivalRecord {
    let station = if raw.statn_nm.trim().is_empty() {
        queried.trim()
    } else {
        raw.statn_nm.trim()
    };

    ArrivalRecord {
        line: canonical_line_id(&raw.subway_id),
        station: station.to_string(),
        direction: Direction::parse(&raw.updn_line).ok(),
        destination: raw.bstatn_nm.trim().to_string(),
        message: raw.arvl_msg2.trim().to_string(),
        seconds: parse_seconds(&raw.barvl_dt),
        category: raw
            .btrain_sttus
            .as_deref()
            .map(TrainCategory::from_status)
            .unwrap_or_default(),
        train_no: raw
            .btrain_no
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        last_train: raw.lstcar_at.as_deref() == Some("1"),
    }
}
