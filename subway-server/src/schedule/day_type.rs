//! Service day classification in Seoul local time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use chrono_tz::Asia::Seoul;
use serde::Serialize;

/// Which published timetable applies on a date. Public holidays are not
/// modelled and fall under [`DayType::Weekday`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Saturday,
    Holiday,
}

impl DayType {
    pub fn for_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat => DayType::Saturday,
            Weekday::Sun => DayType::Holiday,
            _ => DayType::Weekday,
        }
    }

    /// Parse an English name (`weekday`, `saturday`, `holiday`, `sunday`)
    /// or a Korean label (`평일`, `토요일`, `일요일`, `공휴일`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekday" | "평일" => Some(DayType::Weekday),
            "saturday" | "토요일" | "토" => Some(DayType::Saturday),
            "holiday" | "sunday" | "일요일" | "공휴일" | "일요일·공휴일" | "일" => {
                Some(DayType::Holiday)
            }
            _ => None,
        }
    }

    /// Day type for the current date in Seoul.
    pub fn today() -> Self {
        Self::for_date(seoul_now().date())
    }

    /// Day-type code: 1 weekday, 2 Saturday, 3 Sunday/holiday. The
    /// full-schedule provider uses this directly.
    pub fn code(self) -> u8 {
        match self {
            DayType::Weekday => 1,
            DayType::Saturday => 2,
            DayType::Holiday => 3,
        }
    }

    /// Day code in the limited-schedule provider's vocabulary.
    pub fn limited_code(self) -> &'static str {
        match self {
            DayType::Weekday => "8",
            DayType::Saturday => "7",
            DayType::Holiday => "9",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "평일",
            DayType::Saturday => "토요일",
            DayType::Holiday => "일요일·공휴일",
        }
    }
}

/// Current wall-clock time in Seoul.
pub fn seoul_now() -> NaiveDateTime {
    Utc::now().with_timezone(&Seoul).naive_local()
}
