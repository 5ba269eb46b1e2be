//! Limited-schedule provider client.
//!
//! One query returns every train calling at a station on a day, with no
//! direction or destination. Times are compact `HHMMSS`.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::provider::{HttpProvider, ProviderError};

use super::day_type::DayType;
use super::entry::{ScheduleTime, TimetableEntry, sort_entries};

/// Default endpoint for the station timetable service.
const DEFAULT_BASE_URL: &str = "https://openapi.kric.go.kr/openapi/convenientInfo/stationTimetable";

/// Operator code for the Seoul metro operator.
const DEFAULT_OPERATOR: &str = "S1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

const SUCCESS_CODE: &str = "00";
const NO_DATA_CODE: &str = "03";

/// Configuration for the limited-schedule client.
#[derive(Debug, Clone)]
pub struct LimitedScheduleConfig {
    /// Service key, sent as a query parameter
    pub api_key: String,
    /// Endpoint URL
    pub base_url: String,
    /// Railway operator code
    pub operator: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LimitedScheduleConfig {
    /// Create a new config with the given service key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }

    /// Set a custom endpoint URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TimetableResponse {
    header: Option<ResponseHeader>,
    #[serde(default)]
    body: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseHeader {
    #[serde(default)]
    result_code: String,
    #[serde(default)]
    result_msg: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TimetableRow {
    trn_no: Value,
    arv_tm: Value,
    dpt_tm: Value,
}

/// Text of a loosely-typed field.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn time(value: &Value) -> Option<ScheduleTime> {
    let raw = text(value);
    // Numeric times lose their leading zero: 53000 is 05:30:00
    if raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return ScheduleTime::parse(&format!("0{raw}"));
    }
    ScheduleTime::parse(&raw)
}

/// Limited-schedule API client.
#[derive(Debug, Clone)]
pub struct LimitedScheduleClient {
    provider: HttpProvider,
    api_key: String,
    base_url: String,
    operator: String,
}

impl LimitedScheduleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LimitedScheduleConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            provider: HttpProvider::new(config.timeout_secs, config.max_concurrent)?,
            api_key: config.api_key,
            base_url: config.base_url,
            operator: config.operator,
        })
    }

    /// All trains at a station on `day`, sorted by departure.
    pub async fn get_timetable(
        &self,
        line_code: &str,
        station_code: &str,
        day: DayType,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("KRIC_API_KEY".to_string()));
        }

        let response: TimetableResponse = self
            .provider
            .get_json(
                &self.base_url,
                &[
                    ("serviceKey", self.api_key.as_str()),
                    ("format", "json"),
                    ("railOprIsttCd", self.operator.as_str()),
                    ("dayCd", day.limited_code()),
                    ("lnCd", line_code),
                    ("stinCd", station_code),
                ],
            )
            .await?;

        let entries = entries_from_response(response)?;
        debug!(line_code, station_code, count = entries.len(), "limited timetable");
        Ok(entries)
    }
}

fn entries_from_response(response: TimetableResponse) -> Result<Vec<TimetableEntry>, ProviderError> {
    if let Some(header) = response.header {
        match header.result_code.as_str() {
            SUCCESS_CODE => {}
            NO_DATA_CODE => return Ok(Vec::new()),
            _ => {
                return Err(ProviderError::Provider {
                    code: header.result_code,
                    message: header.result_msg,
                });
            }
        }
    }

    // The body is a list, or a single object when there is one row
    let rows: Vec<TimetableRow> = match response.body {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        item @ Value::Object(_) => serde_json::from_value(item).into_iter().collect(),
        _ => Vec::new(),
    };

    let mut entries: Vec<TimetableEntry> = rows
        .iter()
        .filter_map(|row| {
            let arrival = time(&row.arv_tm);
            // Terminating trains have no departure; origin trains no arrival
            let departure = time(&row.dpt_tm).or(arrival)?;
            Some(TimetableEntry {
                train_no: text(&row.trn_no),
                destination: String::new(),
                departure,
                arrival,
                express: false,
            })
        })
        .collect();
    sort_entries(&mut entries);
    Ok(entries)
}
