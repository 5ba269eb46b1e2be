//! Full-schedule provider client.
//!
//! Two services: a station-name lookup that yields per-line station codes,
//! and a timetable by code, day type and direction. Rows carry destination
//! and express information.

use serde::Deserialize;
use tracing::debug;

use crate::provider::{HttpProvider, ProviderError};
use crate::topology::LineId;

use super::day_type::DayType;
use super::entry::{ScheduleTime, TimetableEntry, sort_entries};

/// Default base URL for the full-schedule API.
const DEFAULT_BASE_URL: &str = "http://openAPI.seoul.go.kr:8088";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

const LOOKUP_SERVICE: &str = "SearchInfoBySubwayNameService";
const TIMETABLE_SERVICE: &str = "SearchSTNTimeTableByFRCodeService";

/// Rows requested from the timetable service; one station-direction-day
/// never exceeds this.
const TIMETABLE_ROWS: u32 = 500;

/// Envelope code for "no matching data".
const NO_DATA_CODE: &str = "INFO-200";

/// Configuration for the full-schedule client.
#[derive(Debug, Clone)]
pub struct FullScheduleConfig {
    /// API key, embedded in the request path
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FullScheduleConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
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

/// A station's code on one line, as the provider knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationInfo {
    pub line: LineId,
    pub code: String,
}

#[derive(Debug, Deserialize)]
struct ServiceResult {
    #[serde(rename = "CODE", default)]
    code: String,
    #[serde(rename = "MESSAGE", default)]
    message: String,
}

/// `{"<service>": {"RESULT": ..., "row": [...]}}`, or a bare `RESULT` when
/// the service found nothing.
#[derive(Debug, Deserialize)]
struct ServiceBody<R> {
    #[serde(rename = "RESULT")]
    result: Option<ServiceResult>,
    #[serde(default = "Vec::new")]
    row: Vec<R>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "SearchInfoBySubwayNameService")]
    service: Option<ServiceBody<LookupRow>>,
    #[serde(rename = "RESULT")]
    result: Option<ServiceResult>,
}

#[derive(Debug, Deserialize)]
struct LookupRow {
    #[serde(rename = "LINE_NUM", default)]
    line_num: String,
    #[serde(rename = "FR_CODE", default)]
    fr_code: String,
}

#[derive(Debug, Deserialize)]
struct TimetableResponse {
    #[serde(rename = "SearchSTNTimeTableByFRCodeService")]
    service: Option<ServiceBody<TimetableRow>>,
    #[serde(rename = "RESULT")]
    result: Option<ServiceResult>,
}

#[derive(Debug, Deserialize)]
struct TimetableRow {
    #[serde(rename = "TRAIN_NO", default)]
    train_no: String,
    #[serde(rename = "SUBWAYENAME", default)]
    destination: String,
    #[serde(rename = "LEFTTIME", default)]
    left_time: String,
    #[serde(rename = "ARRIVETIME", default)]
    arrive_time: String,
    #[serde(rename = "EXPRESS_YN", default)]
    express_yn: String,
}

/// Provider `LINE_NUM` ("04호선") to a line id ("4호선"). Other names pass
/// through trimmed.
pub fn normalize_line_num(line_num: &str) -> LineId {
    let line_num = line_num.trim();
    if let Some(number) = line_num.strip_suffix("호선") {
        let number = number.trim_start_matches('0');
        if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
            return LineId::new(format!("{number}호선"));
        }
    }
    LineId::new(line_num)
}

/// Full-schedule API client.
#[derive(Debug, Clone)]
pub struct FullScheduleClient {
    provider: HttpProvider,
    api_key: String,
    base_url: String,
}

impl FullScheduleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FullScheduleConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            provider: HttpProvider::new(config.timeout_secs, config.max_concurrent)?,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, service: &str, range: &str, args: &[&str]) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("SEOUL_API_KEY".to_string()));
        }
        let mut url = format!("{}/{}/json/{}/{}", self.base_url, self.api_key, service, range);
        for arg in args {
            url.push('/');
            url.push_str(arg);
        }
        Ok(url)
    }

    /// Station codes for every line the provider lists under `station`, in
    /// provider order.
    pub async fn lookup_station(&self, station: &str) -> Result<Vec<StationInfo>, ProviderError> {
        let url = self.url(LOOKUP_SERVICE, "1/20", &[station])?;
        let response: LookupResponse = self.provider.get_json(&url, &[]).await?;
        let rows = service_rows(response.service, response.result)?;

        let infos: Vec<StationInfo> = rows
            .into_iter()
            .filter(|row| !row.fr_code.trim().is_empty())
            .map(|row| StationInfo {
                line: normalize_line_num(&row.line_num),
                code: row.fr_code.trim().to_string(),
            })
            .collect();
        debug!(station, count = infos.len(), "station lookup");
        Ok(infos)
    }

    /// Timetable for a station code, sorted by departure.
    ///
    /// `direction_code` is 1 for 상행/내선 and 2 for 하행/외선.
    pub async fn get_timetable(
        &self,
        code: &str,
        day: DayType,
        direction_code: u8,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        let range = format!("1/{TIMETABLE_ROWS}");
        let day_code = day.code().to_string();
        let direction = direction_code.to_string();
        let url = self.url(TIMETABLE_SERVICE, &range, &[code, &day_code, &direction])?;

        let response: TimetableResponse = self.provider.get_json(&url, &[]).await?;
        let rows = service_rows(response.service, response.result)?;
        Ok(entries_from_rows(rows))
    }
}

/// Rows from a service body, treating "no data" as empty.
fn service_rows<R>(
    service: Option<ServiceBody<R>>,
    top_level: Option<ServiceResult>,
) -> Result<Vec<R>, ProviderError> {
    let (rows, result) = match service {
        Some(body) => (body.row, body.result),
        None => (Vec::new(), top_level),
    };

    match result {
        Some(result) if result.code == NO_DATA_CODE => Ok(Vec::new()),
        Some(result) if !result.code.is_empty() && !result.code.starts_with("INFO-000") => {
            Err(ProviderError::Provider {
                code: result.code,
                message: result.message,
            })
        }
        _ => Ok(rows),
    }
}

fn entries_from_rows(rows: Vec<TimetableRow>) -> Vec<TimetableEntry> {
    let mut entries: Vec<TimetableEntry> = rows
        .into_iter()
        .filter_map(|row| {
            let Some(departure) = ScheduleTime::parse(&row.left_time) else {
                debug!(train = %row.train_no, time = %row.left_time, "skipping row without departure");
                return None;
            };
            let express_yn = row.express_yn.trim();
            Some(TimetableEntry {
                train_no: row.train_no.trim().to_string(),
                destination: row.destination.trim().to_string(),
                departure,
                arrival: ScheduleTime::parse(&row.arrive_time),
                express: !express_yn.is_empty() && express_yn != "G",
            })
        })
        .collect();
    sort_entries(&mut entries);
    entries
}
