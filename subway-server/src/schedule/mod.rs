//! Station timetables.
//!
//! Two providers publish timetables for disjoint sets of lines. The
//! full-schedule provider splits by direction and names destinations; the
//! limited one does neither. [`ScheduleAggregator`] picks the provider per
//! line and normalizes both into [`StationTimetable`].

mod aggregator;
#[cfg(test)]
mod aggregator_tests;
mod cache;
mod day_type;
mod entry;
mod error;
mod full;
mod limited;

pub use aggregator::{
    DirectionTimetable, FULL_LINES, FullScheduleSource, LIMITED_LINES, LimitedScheduleSource,
    ScheduleAggregator, ScheduleBackend, StationTimetable,
};
pub use cache::{StationCode, StationCodeCache};
pub use day_type::{DayType, seoul_now};
pub use entry::{ScheduleTime, TimetableEntry, first_last, sort_entries, upcoming};
pub use error::ScheduleError;
pub use full::{FullScheduleClient, FullScheduleConfig, StationInfo, normalize_line_num};
pub use limited::{LimitedScheduleClient, LimitedScheduleConfig};
