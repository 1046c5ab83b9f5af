use chrono::NaiveDate;

use crate::error::{invalid, Result};
use crate::filtering::filter_date_range;
use crate::recoating::RecoatingRecord;
use crate::types::TimeSeriesTable;

/// Column names used by the nightly tables.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const BLOCK_COUNT: &str = "BlockCount";
    pub const OBS_TIME: &str = "ObsTime";
    pub const SHUTTER_OPEN_TIME: &str = "ShutterOpenTime";
    pub const TIME_LOST_TO_WEATHER: &str = "TimeLostToWeather";
    pub const TIME_LOST_TO_PROBLEMS: &str = "TimeLostToProblems";
    pub const ENGINEERING_TIME: &str = "EngineeringTime";
    pub const SCIENCE_TIME: &str = "ScienceTime";
    pub const NIGHT_LENGTH: &str = "NightLength";
}

/// Inclusive range of night dates to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(invalid(format!(
                "the start date ({start}) must be earlier than the end date ({end})"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Supplier of per-night tables. Each night is labelled with the date on
/// which it starts, and all times are in seconds.
pub trait NightlySource {
    /// `Date`, `BlockCount`: accepted block visits of science proposals.
    fn block_visits(&self, range: DateRange) -> Result<TimeSeriesTable>;

    /// `Date`, `TimeLostToWeather`, `TimeLostToProblems`, `EngineeringTime`,
    /// `ScienceTime`, `NightLength`.
    fn time_breakdown(&self, range: DateRange) -> Result<TimeSeriesTable>;

    /// `Date`, `ObsTime`: observing time of accepted science block visits.
    fn observation_time(&self, range: DateRange) -> Result<TimeSeriesTable>;

    /// `Date`, `ShutterOpenTime`: science and commissioning exposure time.
    fn shutter_open_time(&self, range: DateRange) -> Result<TimeSeriesTable>;

    /// Every recorded mirror segment replacement.
    fn mirror_recoatings(&self) -> Result<Vec<RecoatingRecord>>;
}

/// In-memory source serving fixed tables.
#[derive(Debug, Clone)]
pub struct StaticNightlySource {
    pub block_visits: TimeSeriesTable,
    pub time_breakdown: TimeSeriesTable,
    pub observation_time: TimeSeriesTable,
    pub shutter_open_time: TimeSeriesTable,
    pub recoatings: Vec<RecoatingRecord>,
}

impl Default for StaticNightlySource {
    fn default() -> Self {
        use columns::*;
        Self {
            block_visits: TimeSeriesTable::empty(DATE, &[BLOCK_COUNT]),
            time_breakdown: TimeSeriesTable::empty(
                DATE,
                &[
                    TIME_LOST_TO_WEATHER,
                    TIME_LOST_TO_PROBLEMS,
                    ENGINEERING_TIME,
                    SCIENCE_TIME,
                    NIGHT_LENGTH,
                ],
            ),
            observation_time: TimeSeriesTable::empty(DATE, &[OBS_TIME]),
            shutter_open_time: TimeSeriesTable::empty(DATE, &[SHUTTER_OPEN_TIME]),
            recoatings: Vec::new(),
        }
    }
}

impl NightlySource for StaticNightlySource {
    fn block_visits(&self, range: DateRange) -> Result<TimeSeriesTable> {
        Ok(filter_date_range(&self.block_visits, range.start, range.end))
    }

    fn time_breakdown(&self, range: DateRange) -> Result<TimeSeriesTable> {
        Ok(filter_date_range(&self.time_breakdown, range.start, range.end))
    }

    fn observation_time(&self, range: DateRange) -> Result<TimeSeriesTable> {
        Ok(filter_date_range(&self.observation_time, range.start, range.end))
    }

    fn shutter_open_time(&self, range: DateRange) -> Result<TimeSeriesTable> {
        Ok(filter_date_range(&self.shutter_open_time, range.start, range.end))
    }

    fn mirror_recoatings(&self) -> Result<Vec<RecoatingRecord>> {
        Ok(self.recoatings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, ColumnStore};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn static_source_serves_requested_range_only() {
        let source = StaticNightlySource {
            block_visits: TimeSeriesTable::from_dates(
                columns::DATE,
                vec![d(2016, 4, 30), d(2016, 5, 1), d(2016, 5, 2)],
                vec![Column::new(columns::BLOCK_COUNT, vec![1.0, 2.0, 3.0])],
            )
            .unwrap(),
            ..Default::default()
        };
        let range = DateRange::new(d(2016, 5, 1), d(2016, 5, 31)).unwrap();
        let t = source.block_visits(range).unwrap();
        assert_eq!(t.column(columns::BLOCK_COUNT).unwrap(), &[2.0, 3.0]);
        assert!(source.time_breakdown(range).unwrap().is_empty());
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(DateRange::new(d(2016, 5, 1), d(2016, 5, 1)).is_err());
    }
}
