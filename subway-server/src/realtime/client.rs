//! Real-time arrival HTTP client.

use tracing::debug;

use crate::provider::{HttpProvider, ProviderError};

use super::convert::normalize_arrival;
use super::rank::sort_by_rank;
use super::record::ArrivalRecord;
use super::types::ArrivalResponse;

/// Default base URL for the real-time arrival API.
const DEFAULT_BASE_URL: &str = "http://swopenAPI.seoul.go.kr/api/subway";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Rows requested per station.
const MAX_ROWS: u32 = 20;

/// Envelope code for "no matching data", which is an empty board rather
/// than a failure.
const NO_DATA_CODE: &str = "INFO-200";

/// Configuration for the real-time client.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// API key, embedded in the request path
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RealtimeConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
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

/// Real-time arrival API client.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    provider: HttpProvider,
    api_key: String,
    base_url: String,
}

impl RealtimeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RealtimeConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            provider: HttpProvider::new(config.timeout_secs, config.max_concurrent)?,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Arrivals at `station`, normalized and sorted by rank key.
    pub async fn get_arrivals(&self, station: &str) -> Result<Vec<ArrivalRecord>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("SEOUL_API_KEY".to_string()));
        }

        let url = format!(
            "{}/{}/json/realtimeStationArrival/0/{}/{}",
            self.base_url, self.api_key, MAX_ROWS, station
        );
        let response: ArrivalResponse = self.provider.get_json(&url, &[]).await?;
        let records = records_from_response(&response, station)?;
        debug!(station, count = records.len(), "fetched arrivals");
        Ok(records)
    }
}

/// Check the envelope and normalize the rows.
fn records_from_response(
    response: &ArrivalResponse,
    station: &str,
) -> Result<Vec<ArrivalRecord>, ProviderError> {
    if let Some(envelope) = response.envelope()
        && envelope.status_code() != Some(200)
    {
        if envelope.code == NO_DATA_CODE {
            return Ok(Vec::new());
        }
        return Err(ProviderError::Provider {
            code: envelope.code,
            message: envelope.message,
        });
    }

    let mut records: Vec<ArrivalRecord> = response
        .realtime_arrival_list
        .iter()
        .map(|raw| normalize_arrival(raw, station))
        .collect();
    sort_by_rank(&mut records);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::parse_body;

    #[test]
    fn config_builder() {
        let config = RealtimeConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = RealtimeConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn client_creation() {
        assert!(RealtimeClient::new(RealtimeConfig::new("test-key")).is_ok());
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = RealtimeClient::new(RealtimeConfig::new("")).unwrap();
        let err = client.get_arrivals("강남").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn response_rows_are_ranked() {
        let body = r#"{
            "errorMessage": {"status": 200, "code": "INFO-000", "message": "정상 처리되었습니다."},
            "realtimeArrivalList": [
                {"subwayId": "1002", "updnLine": "외선", "bstatnNm": "성수", "barvlDt": "0", "arvlMsg2": "3번째 전역"},
                {"subwayId": "1002", "updnLine": "내선", "bstatnNm": "성수", "barvlDt": "0", "arvlMsg2": "전역 도착"},
                {"subwayId": "1077", "updnLine": "하행", "bstatnNm": "광교", "barvlDt": "45", "arvlMsg2": "45초 후"}
            ]
        }"#;
        let response: ArrivalResponse = parse_body(body).unwrap();
        let records = records_from_response(&response, "강남").unwrap();

        let keys: Vec<u32> = records.iter().map(ArrivalRecord::rank_key).collect();
        assert_eq!(keys, [45, 120, 360]);
        assert_eq!(records[0].line.as_str(), "신분당선");
        assert!(records.iter().all(|r| r.station == "강남"));
    }

    #[test]
    fn error_envelope_is_provider_error() {
        let body = r#"{"errorMessage": {"status": 500, "code": "ERROR-337", "message": "트래픽 초과"},
                       "realtimeArrivalList": []}"#;
        let response: ArrivalResponse = parse_body(body).unwrap();
        let err = records_from_response(&response, "강남").unwrap_err();
        assert!(matches!(err, ProviderError::Provider { code, .. } if code == "ERROR-337"));
    }

    #[test]
    fn no_data_envelope_is_empty() {
        let body = r#"{"status": 500, "code": "INFO-200", "message": "해당하는 데이터가 없습니다."}"#;
        let response: ArrivalResponse = parse_body(body).unwrap();
        assert!(records_from_response(&response, "강남").unwrap().is_empty());
    }
}
