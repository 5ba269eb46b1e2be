//! Canonical real-time arrival record.

use serde::Serialize;

use crate::topology::{Direction, LineId};

use super::rank::rank_key;

/// Service class of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainCategory {
    #[default]
    Normal,
    Express,
}

impl TrainCategory {
    /// Classify a provider train-class string ("일반", "급행", "특급", ...).
    pub fn from_status(status: &str) -> Self {
        if status.contains("급행") || status.contains("특급") {
            TrainCategory::Express
        } else {
            TrainCategory::Normal
        }
    }
}

/// One upcoming train at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalRecord {
    pub line: LineId,
    pub station: String,
    /// `None` when the provider sent a label we do not recognise.
    pub direction: Option<Direction>,
    /// Terminal station, possibly empty.
    pub destination: String,
    /// Raw provider status text.
    pub message: String,
    /// Estimated seconds to arrival, 0 if unknown.
    pub seconds: u32,
    pub category: TrainCategory,
    pub train_no: Option<String>,
    pub last_train: bool,
}

impl ArrivalRecord {
    /// Heuristic ordering key, smaller is sooner.
    pub fn rank_key(&self) -> u32 {
        rank_key(self.seconds, &self.message)
    }

    /// Short human-readable arrival time: "3분 20초", "45초", or the status
    /// text when no estimate is available.
    pub fn display(&self) -> String {
        if self.seconds == 0 {
            return self.message.clone();
        }
        let (minutes, seconds) = (self.seconds / 60, self.seconds % 60);
        if minutes > 0 {
            format!("{minutes}분 {seconds}초")
        } else {
            format!("{seconds}초")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seconds: u32, message: &str) -> ArrivalRecord {
        ArrivalRecord {
            line: LineId::new("2호선"),
            station: "강남".into(),
            direction: Some(Direction::Inner),
            destination: "성수".into(),
            message: message.into(),
            seconds,
            category: TrainCategory::Normal,
            train_no: None,
            last_train: false,
        }
    }

    #[test]
    fn display_formats() {
        assert_eq!(record(200, "3분 후").display(), "3분 20초");
        assert_eq!(record(45, "").display(), "45초");
        assert_eq!(record(120, "").display(), "2분 0초");
        assert_eq!(record(0, "전역 출발").display(), "전역 출발");
    }

    #[test]
    fn category_from_status() {
        assert_eq!(TrainCategory::from_status("급행"), TrainCategory::Express);
        assert_eq!(TrainCategory::from_status("ITX-특급"), TrainCategory::Express);
        assert_eq!(TrainCategory::from_status("일반"), TrainCategory::Normal);
        assert_eq!(TrainCategory::from_status(""), TrainCategory::Normal);
    }

    #[test]
    fn serializes_labels() {
        let json = serde_json::to_value(record(45, "")).unwrap();
        assert_eq!(json["line"], "2호선");
        assert_eq!(json["direction"], "내선");
        assert_eq!(json["category"], "normal");
    }
}
