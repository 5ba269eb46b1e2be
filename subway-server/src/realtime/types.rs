//! Real-time arrival API response DTOs.
//!
//! These map directly to the `realtimeStationArrival` JSON. The provider is
//! loose with types (numbers sometimes arrive as strings) and omits fields
//! freely, so everything defaults.

use serde::Deserialize;
use serde_json::Value;

/// Response from `realtimeStationArrival`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalResponse {
    /// Result envelope on normal responses.
    pub error_message: Option<ResultEnvelope>,

    /// Arrival rows in provider order.
    #[serde(default)]
    pub realtime_arrival_list: Vec<RawArrival>,

    /// Failures and "no data" answers put the envelope at the top level.
    #[serde(default)]
    pub status: Value,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Provider result envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ResultEnvelope {
    /// Numeric status, accepting `200` or `"200"`.
    pub fn status_code(&self) -> Option<i64> {
        lenient_int(&self.status)
    }
}

impl ArrivalResponse {
    /// The envelope, wherever the provider put it.
    pub fn envelope(&self) -> Option<ResultEnvelope> {
        if let Some(envelope) = &self.error_message {
            return Some(envelope.clone());
        }
        self.code.as_ref().map(|code| ResultEnvelope {
            status: self.status.clone(),
            code: code.clone(),
            message: self.message.clone().unwrap_or_default(),
        })
    }
}

/// One arrival row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawArrival {
    /// Provider line id, e.g. "1002".
    pub subway_id: String,

    /// "상행"/"하행" or "내선"/"외선".
    pub updn_line: String,

    /// Station the row is for.
    pub statn_nm: String,

    /// Terminal station of the train.
    pub bstatn_nm: String,

    /// Seconds to arrival. Usually a string, sometimes a number.
    pub barvl_dt: Value,

    /// Free-text status, e.g. "전역 출발", "3번째 전역 (교대)".
    pub arvl_msg2: String,

    /// Train class, e.g. "일반", "급행", "ITX".
    pub btrain_sttus: Option<String>,

    /// Train number.
    pub btrain_no: Option<String>,

    /// "1" when this is the last train of the day.
    pub lstcar_at: Option<String>,
}

/// Integer from a JSON number or numeric string.
pub(crate) fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
