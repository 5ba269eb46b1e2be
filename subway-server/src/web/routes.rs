//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::board::{self, RouteQuery};
use crate::realtime::{arrivals_at, filter};
use crate::route::ResolveError;
use crate::schedule::{DayType, ScheduleError, ScheduleTime, seoul_now};
use crate::topology::{DEFAULT_SUGGESTIONS, Direction, LineId, Network};

use super::dto::*;
use super::state::AppState;

/// Upcoming trains listed per timetable section by default.
const DEFAULT_UPCOMING: usize = 5;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations/search", get(search_stations))
        .route("/api/route", get(resolve_route))
        .route("/api/arrivals", get(station_arrivals))
        .route("/api/route/arrivals", get(route_arrivals))
        .route("/api/timetable", get(timetable))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stations by partial name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .network
        .search_station(&req.q, limit)
        .into_iter()
        .map(|name| StationSearchResult {
            lines: state.network.station_lines(&name),
            name,
        })
        .collect();

    Json(StationSearchResponse { stations })
}

/// Line and direction of travel between two stations.
async fn resolve_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let line = parse_line(&state.network, req.line.as_deref())?;
    let route = state
        .resolver
        .route(&req.from, &req.to, line.as_ref())
        .map_err(|e| AppError::from_resolve(&state.network, e))?;

    Ok(Json(RouteResponse {
        from: state.network.normalize_station_name(&req.from),
        to: state.network.normalize_station_name(&req.to),
        line: route.line,
        direction: route.direction,
    }))
}

/// Real-time board at one station, optionally filtered.
async fn station_arrivals(
    State(state): State<AppState>,
    Query(req): Query<ArrivalsRequest>,
) -> Result<Json<ArrivalsResponse>, AppError> {
    let network = &state.network;
    let station = network.normalize_station_name(&req.station);
    if network.station(&station).is_none() {
        return Err(AppError::unknown_station(network, &req.station));
    }

    let line = parse_line(network, req.line.as_deref())?;
    let direction = parse_direction(req.direction.as_deref())?;

    if let Some(line) = &line {
        let available = network.station_lines(&station);
        if !available.contains(line) {
            return Err(AppError::LineNotAtStation {
                station,
                line: line.clone(),
                available,
            });
        }
    }

    let mut records = arrivals_at(state.arrivals.as_ref(), &station).await;
    if let Some(line) = &line {
        records = filter::by_line(&records, line);
    }
    if let Some(direction) = direction {
        records = filter::by_direction(&records, direction);
    }
    if let Some(destination) = non_blank(req.destination.as_deref()) {
        records = filter::by_destination(&records, filter::destination_token(destination));
    }

    debug!(%station, count = records.len(), "station arrivals");
    Ok(Json(ArrivalsResponse {
        station,
        arrivals: records.iter().map(ArrivalResult::from_record).collect(),
    }))
}

/// Upcoming trains from one station toward another.
async fn route_arrivals(
    State(state): State<AppState>,
    Query(req): Query<RouteArrivalsRequest>,
) -> Result<Json<RouteArrivalsResponse>, AppError> {
    let mut query = RouteQuery::new(&req.from, &req.to);
    if let Some(line) = parse_line(&state.network, req.line.as_deref())? {
        query = query.with_line(line);
    }
    if let Some(direction) = parse_direction(req.direction.as_deref())? {
        query = query.with_direction(direction);
    }
    if let Some(destination) = non_blank(req.destination.as_deref()) {
        query = query.with_destination(destination);
    }
    if let Some(limit) = req.limit {
        query = query.with_limit(limit.min(20));
    }

    let board = board::route_arrivals(&state.resolver, state.arrivals.as_ref(), &query)
        .await
        .map_err(|e| AppError::from_resolve(&state.network, e))?;

    Ok(Json(RouteArrivalsResponse::from_board(&board)))
}

/// Station timetable with first, last and upcoming trains.
async fn timetable(
    State(state): State<AppState>,
    Query(req): Query<TimetableRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    let line = parse_line(&state.network, req.line.as_deref())?;
    let direction = parse_direction(req.direction.as_deref())?;
    let day = match non_blank(req.day.as_deref()) {
        Some(day) => DayType::parse(day).ok_or_else(|| AppError::BadRequest {
            kind: "invalid_day",
            message: format!("Invalid day: {day}"),
        })?,
        None => DayType::today(),
    };
    let upcoming = req.upcoming.unwrap_or(DEFAULT_UPCOMING).min(50);

    let table = state
        .schedules
        .timetable(&req.station, line.as_ref(), direction, day)
        .await
        .map_err(|e| AppError::from_schedule(&state.network, e))?;

    let now = ScheduleTime::from_time(seoul_now().time());
    Ok(Json(TimetableResponse::from_timetable(&table, now, upcoming)))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve an optional line token.
fn parse_line(network: &Network, token: Option<&str>) -> Result<Option<LineId>, AppError> {
    let Some(token) = non_blank(token) else {
        return Ok(None);
    };
    network
        .resolve_line(token)
        .map(Some)
        .ok_or_else(|| AppError::BadRequest {
            kind: "unknown_line",
            message: format!("Unknown line: {token}"),
        })
}

fn parse_direction(token: Option<&str>) -> Result<Option<Direction>, AppError> {
    non_blank(token)
        .map(Direction::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            kind: "invalid_direction",
            message: e.to_string(),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        kind: &'static str,
        message: String,
    },
    NotFound {
        kind: &'static str,
        message: String,
    },
    /// Unknown station, with close matches
    UnknownStation {
        name: String,
        suggestions: Vec<String>,
    },
    /// The station exists but the requested line does not serve it
    LineNotAtStation {
        station: String,
        line: LineId,
        available: Vec<LineId>,
    },
    /// A provider needed for the request has no key configured
    Unavailable {
        kind: &'static str,
        message: String,
    },
}

impl AppError {
    fn unknown_station(network: &Network, name: &str) -> Self {
        let name = name.trim();
        AppError::UnknownStation {
            name: name.to_string(),
            suggestions: network.search_station(name, DEFAULT_SUGGESTIONS),
        }
    }

    fn from_resolve(network: &Network, e: ResolveError) -> Self {
        match e {
            ResolveError::UnknownStation(name) => Self::unknown_station(network, &name),
            ResolveError::StationNotOnLine { station, line } => AppError::LineNotAtStation {
                available: network.station_lines(&station),
                station,
                line,
            },
            ResolveError::UnknownLine(_) => AppError::BadRequest {
                kind: e.kind(),
                message: e.to_string(),
            },
            ResolveError::NoCommonLine { .. } | ResolveError::NoDirection { .. } => {
                AppError::NotFound {
                    kind: e.kind(),
                    message: e.to_string(),
                }
            }
        }
    }

    fn from_schedule(network: &Network, e: ScheduleError) -> Self {
        match e {
            ScheduleError::StationNotFound(name) => Self::unknown_station(network, &name),
            ScheduleError::Unsupported(_) => AppError::BadRequest {
                kind: e.kind(),
                message: e.to_string(),
            },
            ScheduleError::NotConfigured(_) => AppError::Unavailable {
                kind: e.kind(),
                message: e.to_string(),
            },
            ScheduleError::StationCodeNotFound { .. } => AppError::NotFound {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } | AppError::LineNotAtStation { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } | AppError::UnknownStation { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(self) -> ErrorResponse {
        let (kind, error) = match &self {
            AppError::BadRequest { kind, message }
            | AppError::NotFound { kind, message }
            | AppError::Unavailable { kind, message } => (*kind, message.clone()),
            AppError::UnknownStation { name, .. } => {
                ("unknown_station", format!("Unknown station: {name}"))
            }
            AppError::LineNotAtStation { station, line, .. } => (
                "station_not_on_line",
                format!("{station} is not on {line}"),
            ),
        };

        let mut body = ErrorResponse {
            error,
            kind: kind.to_string(),
            suggestions: Vec::new(),
            available_lines: Vec::new(),
        };
        match self {
            AppError::UnknownStation { suggestions, .. } => body.suggestions = suggestions,
            AppError::LineNotAtStation { available, .. } => body.available_lines = available,
            _ => {}
        }
        body
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = self.body();

        if status.is_server_error() {
            warn!(%status, kind = %body.kind, "{}", body.error);
        } else {
            debug!(%status, kind = %body.kind, "{}", body.error);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use std::sync::{Arc, LazyLock};

    static NETWORK: LazyLock<Arc<Network>> =
        LazyLock::new(|| Arc::new(Network::embedded().unwrap()));

    /// State with no provider keys: every provider call fails fast.
    fn state() -> AppState {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        AppState::from_config(&config, Arc::clone(&NETWORK)).unwrap()
    }

    fn arrivals_request(station: &str, line: Option<&str>, direction: Option<&str>) -> ArrivalsRequest {
        ArrivalsRequest {
            station: station.into(),
            line: line.map(Into::into),
            direction: direction.map(Into::into),
            destination: None,
        }
    }

    fn timetable_request(station: &str, line: Option<&str>, day: Option<&str>) -> TimetableRequest {
        TimetableRequest {
            station: station.into(),
            line: line.map(Into::into),
            direction: None,
            day: day.map(Into::into),
            upcoming: None,
        }
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn station_search_lists_lines() {
        let req = StationSearchRequest {
            q: "강남".into(),
            limit: None,
        };
        let Json(resp) = search_stations(State(state()), Query(req)).await;

        let gangnam = &resp.stations[0];
        assert_eq!(gangnam.name, "강남");
        assert!(gangnam.lines.contains(&LineId::new("2호선")));
        assert!(gangnam.lines.contains(&LineId::new("신분당선")));
    }

    #[tokio::test]
    async fn route_with_line_token() {
        let req = RouteRequest {
            from: "사당역".into(),
            to: "이수".into(),
            line: Some("4".into()),
        };
        let Json(resp) = resolve_route(State(state()), Query(req)).await.unwrap();

        assert_eq!(resp.from, "사당");
        assert_eq!(resp.line, LineId::new("4호선"));
        assert_eq!(resp.direction, Direction::Up);
    }

    #[tokio::test]
    async fn route_errors() {
        let req = RouteRequest {
            from: "강남".into(),
            to: "광화문".into(),
            line: None,
        };
        let err = resolve_route(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body().kind, "no_common_line");

        let req = RouteRequest {
            from: "강남".into(),
            to: "교대".into(),
            line: Some("99호선".into()),
        };
        let err = resolve_route(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.body().kind, "unknown_line");
    }

    #[tokio::test]
    async fn unknown_station_has_suggestions() {
        let req = arrivals_request("강남구", None, None);
        let err = station_arrivals(State(state()), Query(req)).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let body = err.body();
        assert_eq!(body.kind, "unknown_station");
        assert!(body.suggestions.contains(&"강남구청".to_string()));
    }

    #[tokio::test]
    async fn line_not_at_station_lists_available() {
        let req = arrivals_request("강남", Some("4호선"), None);
        let err = station_arrivals(State(state()), Query(req)).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.kind, "station_not_on_line");
        assert!(body.available_lines.contains(&LineId::new("2호선")));
    }

    #[tokio::test]
    async fn invalid_direction() {
        let req = arrivals_request("강남", None, Some("북행"));
        let err = station_arrivals(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.body().kind, "invalid_direction");
    }

    #[tokio::test]
    async fn provider_failure_is_empty_board() {
        let req = arrivals_request("강남역", Some("2호선"), Some("내선"));
        let Json(resp) = station_arrivals(State(state()), Query(req)).await.unwrap();

        assert_eq!(resp.station, "강남");
        assert!(resp.arrivals.is_empty());
    }

    #[tokio::test]
    async fn route_board_without_provider() {
        let req = RouteArrivalsRequest {
            from: "사당".into(),
            to: "서울역".into(),
            line: None,
            direction: None,
            destination: Some("당고개행".into()),
            limit: Some(100),
        };
        let Json(resp) = route_arrivals(State(state()), Query(req)).await.unwrap();

        assert_eq!(resp.line, LineId::new("4호선"));
        assert_eq!(resp.direction, Direction::Up);
        assert!(resp.arrivals.is_empty());
    }

    #[tokio::test]
    async fn timetable_outcomes() {
        let req = timetable_request("오금", Some("5호선"), None);
        let err = timetable(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().kind, "schedule_unsupported");

        let req = timetable_request("강남", Some("2호선"), None);
        let err = timetable(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body().kind, "not_configured");

        // The code lookup fails without a key
        let req = timetable_request("교대", Some("3호선"), Some("토요일"));
        let err = timetable(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.body().kind, "station_code_not_found");

        let req = timetable_request("교대", Some("3호선"), Some("friday"));
        let err = timetable(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.body().kind, "invalid_day");

        let req = timetable_request("없는역", None, None);
        let err = timetable(State(state()), Query(req)).await.unwrap_err();
        assert_eq!(err.body().kind, "unknown_station");
    }

    #[test]
    fn error_statuses() {
        let err = AppError::NotFound {
            kind: "no_common_line",
            message: "no line".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = AppError::Unavailable {
            kind: "not_configured",
            message: "no key".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
