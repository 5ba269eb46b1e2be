//! Timetable entries and the views derived from them.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};

/// A time of day on a service timetable.
///
/// Stored as seconds from midnight. Hours past 23 are allowed because some
/// providers write post-midnight trains as "24:10:00". Ordering matches
/// lexicographic order of the zero-padded `HH:MM:SS` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime(u32);

impl ScheduleTime {
    /// Latest hour accepted when parsing.
    const MAX_HOUR: u32 = 29;

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > Self::MAX_HOUR || minute > 59 || second > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse `HH:MM:SS`, `H:MM:SS`, `HH:MM` or the compact `HHMMSS`.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::schedule::ScheduleTime;
    ///
    /// let t = ScheduleTime::parse("053000").unwrap();
    /// assert_eq!(t, ScheduleTime::parse("5:30:00").unwrap());
    /// assert_eq!(t.to_string(), "05:30:00");
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.contains(':') {
            let mut parts = s.split(':').map(|p| p.parse::<u32>().ok());
            let hour = parts.next()??;
            let minute = parts.next()??;
            let second = match parts.next() {
                Some(second) => second?,
                None => 0,
            };
            if parts.next().is_some() {
                return None;
            }
            return Self::from_hms(hour, minute, second);
        }

        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let field = |range: std::ops::Range<usize>| s[range].parse::<u32>().ok();
        Self::from_hms(field(0..2)?, field(2..4)?, field(4..6)?)
    }

    /// A wall-clock time.
    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    pub fn hour(self) -> u32 {
        self.0 / 3600
    }

    pub fn minute(self) -> u32 {
        self.0 / 60 % 60
    }

    pub fn second(self) -> u32 {
        self.0 % 60
    }

    /// `HH:MM` for display.
    pub fn hhmm(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One scheduled train at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    /// Possibly empty.
    pub train_no: String,
    /// Empty when the provider does not report destinations.
    pub destination: String,
    pub departure: ScheduleTime,
    pub arrival: Option<ScheduleTime>,
    pub express: bool,
}

/// Sort by departure time. Stable.
pub fn sort_entries(entries: &mut [TimetableEntry]) {
    entries.sort_by_key(|e| e.departure);
}

/// First and last trains of an ascending timetable.
pub fn first_last(entries: &[TimetableEntry]) -> Option<(&TimetableEntry, &TimetableEntry)> {
    Some((entries.first()?, entries.last()?))
}

/// Up to `n` trains departing at or after `now`, in order.
///
/// An empty result means service has ended for the day.
pub fn upcoming(entries: &[TimetableEntry], now: ScheduleTime, n: usize) -> Vec<&TimetableEntry> {
    entries
        .iter()
        .filter(|e| e.departure >= now)
        .take(n)
        .collect()
}
