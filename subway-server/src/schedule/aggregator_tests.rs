//! Tests for provider selection and timetable assembly.

use super::*;
use crate::provider::ProviderError;
use crate::topology::{Direction, LineId, Network};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

static NETWORK: LazyLock<Arc<Network>> =
    LazyLock::new(|| Arc::new(Network::embedded().unwrap()));

fn line(id: &str) -> LineId {
    LineId::new(id)
}

fn time(s: &str) -> ScheduleTime {
    ScheduleTime::parse(s).unwrap()
}

fn entry(departure: &str, destination: &str) -> TimetableEntry {
    TimetableEntry {
        train_no: String::new(),
        destination: destination.into(),
        departure: time(departure),
        arrival: None,
        express: false,
    }
}

fn provider_error() -> ProviderError {
    ProviderError::Provider {
        code: "ERROR-500".into(),
        message: "서버 오류".into(),
    }
}

/// Full provider serving canned rows. Clones share call records.
#[derive(Clone, Default)]
struct MockFull {
    rows: Vec<StationInfo>,
    failing_direction: Option<u8>,
    lookups: Arc<AtomicUsize>,
    fetches: Arc<Mutex<Vec<(String, u8)>>>,
}

impl MockFull {
    fn with_rows(rows: &[(&str, &str)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|(l, code)| StationInfo {
                    line: line(l),
                    code: code.to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn fetches(&self) -> Vec<(String, u8)> {
        let mut fetches = self.fetches.lock().unwrap().clone();
        fetches.sort();
        fetches
    }
}

impl FullScheduleSource for MockFull {
    async fn lookup_station(&self, _station: &str) -> Result<Vec<StationInfo>, ProviderError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.clone())
    }

    async fn fetch_timetable(
        &self,
        code: &str,
        _day: DayType,
        direction_code: u8,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        self.fetches
            .lock()
            .unwrap()
            .push((code.to_string(), direction_code));
        if self.failing_direction == Some(direction_code) {
            return Err(provider_error());
        }
        let destination = if direction_code == 1 { "대화" } else { "오금" };
        Ok(vec![
            entry("05:30:00", destination),
            entry("06:00:00", destination),
            entry("23:40:00", destination),
        ])
    }
}

#[derive(Clone, Default)]
struct MockLimited {
    calls: Arc<Mutex<Vec<(String, String, String)>>>,
    fail: bool,
}

impl MockLimited {
    fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LimitedScheduleSource for MockLimited {
    async fn fetch_timetable(
        &self,
        line_code: &str,
        station_code: &str,
        day: DayType,
    ) -> Result<Vec<TimetableEntry>, ProviderError> {
        self.calls.lock().unwrap().push((
            line_code.to_string(),
            station_code.to_string(),
            day.limited_code().to_string(),
        ));
        if self.fail {
            return Err(provider_error());
        }
        Ok(vec![
            entry("05:31:00", ""),
            entry("05:36:00", ""),
            entry("12:00:00", ""),
            entry("24:05:00", ""),
        ])
    }
}

fn aggregator(full: MockFull, limited: Option<MockLimited>) -> ScheduleAggregator<MockFull, MockLimited> {
    ScheduleAggregator::new(Arc::clone(&NETWORK), full, limited)
}

// ========== Full provider ==========

#[tokio::test]
async fn unsupported_line_makes_no_calls() {
    let full = MockFull::with_rows(&[("5호선", "2545")]);
    let limited = MockLimited::default();
    let agg = aggregator(full.clone(), Some(limited.clone()));

    let err = agg
        .timetable("오금", Some(&line("5호선")), None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err, ScheduleError::Unsupported(line("5호선")));
    assert_eq!(full.lookups(), 0);
    assert!(full.fetches().is_empty());
    assert!(limited.calls().is_empty());
}

#[tokio::test]
async fn unsupported_line_wins_over_unknown_station() {
    let agg = aggregator(MockFull::default(), None);
    let err = agg
        .timetable("없는역", Some(&line("신분당선")), None, DayType::Weekday)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "schedule_unsupported");
}

#[tokio::test]
async fn both_directions_for_full_line() {
    let full = MockFull::with_rows(&[("2호선", "0223"), ("3호선", "0340")]);
    let agg = aggregator(full.clone(), None);

    let table = agg
        .timetable("교대", Some(&line("3호선")), None, DayType::Saturday)
        .await
        .unwrap();

    assert_eq!(table.station, "교대");
    assert_eq!(table.line, line("3호선"));
    assert_eq!(table.backend, ScheduleBackend::Full);
    assert_eq!(table.day, DayType::Saturday);
    assert!(!table.degraded);

    let directions: Vec<_> = table.sections.iter().map(|s| s.direction).collect();
    assert_eq!(directions, [Some(Direction::Up), Some(Direction::Down)]);
    assert_eq!(table.sections[0].label, "상행");
    assert_eq!(table.sections[0].entries[0].destination, "대화");
    assert_eq!(table.sections[1].entries[0].destination, "오금");

    assert_eq!(
        full.fetches(),
        [("0340".to_string(), 1), ("0340".to_string(), 2)]
    );
}

#[tokio::test]
async fn station_code_is_cached() {
    let full = MockFull::with_rows(&[("3호선", "0340")]);
    let agg = aggregator(full.clone(), None);
    let line3 = line("3호선");

    agg.timetable("교대", Some(&line3), None, DayType::Weekday)
        .await
        .unwrap();
    agg.timetable("교대", Some(&line3), None, DayType::Holiday)
        .await
        .unwrap();

    assert_eq!(full.lookups(), 1);
    assert_eq!(full.fetches().len(), 4);
    assert_eq!(agg.codes().entry_count().await, 1);
}

#[tokio::test]
async fn unfiltered_lookup_serves_later_filtered_query() {
    let full = MockFull::with_rows(&[("3호선", "0329"), ("7호선", "2734")]);
    let agg = aggregator(full.clone(), None);

    let table = agg
        .timetable("고속터미널", None, None, DayType::Weekday)
        .await
        .unwrap();
    assert_eq!(table.line, line("3호선"));

    agg.timetable("고속터미널", Some(&line("3호선")), None, DayType::Weekday)
        .await
        .unwrap();
    assert_eq!(full.lookups(), 1);

    // A different line still needs its own lookup
    let table = agg
        .timetable("고속터미널", Some(&line("7호선")), None, DayType::Weekday)
        .await
        .unwrap();
    assert_eq!(table.line, line("7호선"));
    assert_eq!(full.lookups(), 2);
    // Unfiltered, its resolved line, then 7호선
    assert_eq!(agg.codes().entry_count().await, 3);
}

#[tokio::test]
async fn single_direction() {
    let full = MockFull::with_rows(&[("3호선", "0340")]);
    let agg = aggregator(full.clone(), None);

    let table = agg
        .timetable("교대", Some(&line("3호선")), Some(Direction::Down), DayType::Weekday)
        .await
        .unwrap();

    assert_eq!(table.sections.len(), 1);
    assert_eq!(table.sections[0].direction, Some(Direction::Down));
    assert_eq!(full.fetches(), [("0340".to_string(), 2)]);
}

#[tokio::test]
async fn direction_from_other_scheme_is_relabelled() {
    let full = MockFull::with_rows(&[("3호선", "0340")]);
    let agg = aggregator(full.clone(), None);

    let table = agg
        .timetable("교대", Some(&line("3호선")), Some(Direction::Inner), DayType::Weekday)
        .await
        .unwrap();

    assert_eq!(table.sections[0].direction, Some(Direction::Up));
    assert_eq!(full.fetches(), [("0340".to_string(), 1)]);
}

#[tokio::test]
async fn failed_direction_is_empty_section() {
    let full = MockFull {
        failing_direction: Some(2),
        ..MockFull::with_rows(&[("3호선", "0340")])
    };
    let agg = aggregator(full, None);

    let table = agg
        .timetable("교대", Some(&line("3호선")), None, DayType::Weekday)
        .await
        .unwrap();

    assert_eq!(table.sections.len(), 2);
    assert_eq!(table.sections[0].entries.len(), 3);
    assert!(table.sections[1].entries.is_empty());
    assert!(table.sections[1].first_last().is_none());
}

#[tokio::test]
async fn no_matching_row_is_code_not_found() {
    let agg = aggregator(MockFull::with_rows(&[("2호선", "0223")]), None);

    let err = agg
        .timetable("교대", Some(&line("3호선")), None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ScheduleError::StationCodeNotFound {
            station: "교대".into(),
            line: Some(line("3호선")),
        }
    );
    assert_eq!(agg.codes().entry_count().await, 0);
}

#[tokio::test]
async fn unknown_station_is_rejected_before_lookup() {
    let full = MockFull::with_rows(&[("3호선", "0340")]);
    let agg = aggregator(full.clone(), None);

    let err = agg
        .timetable("없는역", Some(&line("3호선")), None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err, ScheduleError::StationNotFound("없는역".into()));
    assert_eq!(full.lookups(), 0);
}

#[tokio::test]
async fn station_name_is_normalized() {
    let agg = aggregator(MockFull::with_rows(&[("3호선", "0329")]), None);

    let table = agg
        .timetable("고터", Some(&line("3호선")), None, DayType::Weekday)
        .await
        .unwrap();
    assert_eq!(table.station, "고속터미널");
}

// ========== Limited provider ==========

#[tokio::test]
async fn circular_line_is_degraded_single_section() {
    let full = MockFull::default();
    let limited = MockLimited::default();
    let agg = aggregator(full.clone(), Some(limited.clone()));

    let table = agg
        .timetable("강남", Some(&line("2호선")), Some(Direction::Inner), DayType::Holiday)
        .await
        .unwrap();

    assert_eq!(table.backend, ScheduleBackend::Limited);
    assert!(table.degraded);
    assert_eq!(table.sections.len(), 1);

    let section = &table.sections[0];
    assert_eq!(section.direction, None);
    assert_eq!(section.label, "순환");

    let (first, last) = section.first_last().unwrap();
    assert_eq!(first.departure.to_string(), "05:31:00");
    assert_eq!(last.departure.to_string(), "24:05:00");

    let next: Vec<String> = section
        .upcoming(time("05:32:00"), 2)
        .iter()
        .map(|e| e.departure.hhmm())
        .collect();
    assert_eq!(next, ["05:36", "12:00"]);

    let calls = limited.calls();
    assert_eq!(calls, [("2".to_string(), "222".to_string(), "9".to_string())]);
    assert_eq!(full.lookups(), 0);
}

#[tokio::test]
async fn linear_limited_line_label() {
    let limited = MockLimited::default();
    let agg = aggregator(MockFull::default(), Some(limited.clone()));

    let table = agg
        .timetable("서울역", Some(&line("1호선")), None, DayType::Weekday)
        .await
        .unwrap();

    assert_eq!(table.sections[0].label, "전방향");
    let calls = limited.calls();
    assert_eq!(calls[0].0, "1");
    assert_eq!(calls[0].1, "150");
}

#[tokio::test]
async fn limited_failure_is_empty_section() {
    let limited = MockLimited {
        fail: true,
        ..MockLimited::default()
    };
    let agg = aggregator(MockFull::default(), Some(limited));

    let table = agg
        .timetable("강남", Some(&line("2호선")), None, DayType::Weekday)
        .await
        .unwrap();

    assert!(table.degraded);
    assert!(table.sections[0].entries.is_empty());
}

#[tokio::test]
async fn limited_without_client_is_not_configured() {
    let agg = aggregator(MockFull::default(), None);

    let err = agg
        .timetable("강남", Some(&line("2호선")), None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err, ScheduleError::NotConfigured(line("2호선")));
}

#[tokio::test]
async fn limited_station_without_code() {
    let limited = MockLimited::default();
    let agg = aggregator(MockFull::default(), Some(limited.clone()));

    let err = agg
        .timetable("개봉", Some(&line("1호선")), None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "station_code_not_found");
    assert!(limited.calls().is_empty());
}

// ========== No line given ==========

#[tokio::test]
async fn unfiltered_lookup_redirects_to_limited() {
    let full = MockFull::with_rows(&[("2호선", "0222"), ("신분당선", "D07")]);
    let agg = aggregator(full.clone(), Some(MockLimited::default()));

    let table = agg
        .timetable("강남", None, None, DayType::Weekday)
        .await
        .unwrap();

    assert_eq!(table.line, line("2호선"));
    assert_eq!(table.backend, ScheduleBackend::Limited);
    assert!(table.degraded);
    assert!(full.fetches().is_empty());
}

#[tokio::test]
async fn redirect_without_limited_client_is_not_configured() {
    let agg = aggregator(MockFull::with_rows(&[("2호선", "0222")]), None);

    let err = agg
        .timetable("강남", None, None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err, ScheduleError::NotConfigured(line("2호선")));
}

#[tokio::test]
async fn unfiltered_lookup_on_unsupported_line() {
    let full = MockFull::with_rows(&[("신분당선", "D07"), ("2호선", "0222")]);
    let agg = aggregator(full.clone(), Some(MockLimited::default()));

    let err = agg
        .timetable("강남", None, None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(err, ScheduleError::Unsupported(line("신분당선")));
    assert!(full.fetches().is_empty());
}

#[tokio::test]
async fn empty_lookup_without_line() {
    let agg = aggregator(MockFull::default(), None);

    let err = agg
        .timetable("교대", None, None, DayType::Weekday)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ScheduleError::StationCodeNotFound {
            station: "교대".into(),
            line: None,
        }
    );
}
