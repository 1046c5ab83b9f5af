use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::error::{invalid, Result, StatsError};

/// Nominal month length in seconds (365.25 days / 12).
pub const AVERAGE_MONTH_SECONDS: i64 = 2_629_800;

/// Day of month used as the marker for a whole month.
pub const MID_MONTH_DAY: u32 = 15;

/// Fixed month step used to keep month buckets equidistant.
pub fn average_month_length() -> Duration {
    Duration::seconds(AVERAGE_MONTH_SECONDS)
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// `date` moved back by `days` days.
///
/// Fails if the result falls outside the dates chrono can represent.
pub fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_sub_signed(delta))
        .ok_or_else(|| invalid(format!("{days} days before {date} is out of range")))
}

/// `date` moved forward by `days` days.
pub fn days_after(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| invalid(format!("{days} days after {date} is out of range")))
}

/// The `days` consecutive dates ending the day before `date`.
pub fn day_range(date: NaiveDate, days: i64) -> Result<(NaiveDate, NaiveDate)> {
    if days <= 0 {
        return Err(invalid(format!("number of days must be positive, got {days}")));
    }
    Ok((days_before(date, days)?, days_before(date, 1)?))
}

/// Shift a (year, month) pair by `delta` calendar months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Months from `(y1, m1)` to `(y2, m2)`, negative if the second lies earlier.
pub fn months_between(y1: i32, m1: u32, y2: i32, m2: u32) -> i32 {
    (y2 * 12 + m2 as i32) - (y1 * 12 + m1 as i32)
}

fn mid_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, MID_MONTH_DAY)
        .ok_or_else(|| invalid(format!("no mid-month date for {year}-{month}")))
}

/// Mid-month markers of the `months` months preceding the month of `date`.
///
/// Returns `(first, last)`, where `last` lies in the month immediately before
/// the one containing `date`.
pub fn month_range(date: NaiveDate, months: i32) -> Result<(NaiveDate, NaiveDate)> {
    if months <= 0 {
        return Err(invalid(format!("number of months must be positive, got {months}")));
    }
    let (end_year, end_month) = shift_month(date.year(), date.month(), -1);
    let (start_year, start_month) = shift_month(date.year(), date.month(), -months);
    Ok((mid_month(start_year, start_month)?, mid_month(end_year, end_month)?))
}

/// All mid-month markers covered by [`month_range`], oldest first.
pub fn month_markers(date: NaiveDate, months: i32) -> Result<Vec<NaiveDate>> {
    let (start, _) = month_range(date, months)?;
    (0..months)
        .map(|i| {
            let (y, m) = shift_month(start.year(), start.month(), i);
            mid_month(y, m)
        })
        .collect()
}

/// SALT observing semester.
///
/// Semester 1 runs from 1 May to 31 October, semester 2 from 1 November to
/// 30 April. The year is always the year in which the semester starts.
///
/// Any year is accepted, but the day bounds only exist for semesters that lie
/// within chrono's date range; outside it they are an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semester {
    pub year: i32,
    pub half: u8,
}

impl Semester {
    pub fn new(year: i32, half: u8) -> Result<Self> {
        if half != 1 && half != 2 {
            return Err(invalid(format!("semester half must be 1 or 2, got {half}")));
        }
        Ok(Self { year, half })
    }

    pub fn containing(date: NaiveDate) -> Self {
        match date.month() {
            1..=4 => Self { year: date.year() - 1, half: 2 },
            5..=10 => Self { year: date.year(), half: 1 },
            _ => Self { year: date.year(), half: 2 },
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        let (y, m) = if self.half == 1 { (self.year, 5) } else { (self.year, 11) };
        self.day(y, m, 1)
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        let (y, m, d) = if self.half == 1 {
            (Some(self.year), 10, 31)
        } else {
            (self.year.checked_add(1), 4, 30)
        };
        let y = y.ok_or_else(|| invalid(format!("semester {self} has no last day")))?;
        self.day(y, m, d)
    }

    fn day(&self, year: i32, month: u32, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid(format!("semester {self} lies outside the supported dates")))
    }

    /// Number of nights in the semester, first and last day included.
    pub fn length_days(&self) -> Result<i64> {
        Ok((self.last_day()? - self.first_day()?).num_days() + 1)
    }

    pub fn next(&self) -> Self {
        if self.half == 1 {
            Self { year: self.year, half: 2 }
        } else {
            Self { year: self.year + 1, half: 1 }
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.half)
    }
}

impl FromStr for Semester {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let (year, half) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| invalid(format!("not a semester id: {s:?}")))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| invalid(format!("bad semester year in {s:?}")))?;
        let half = half
            .parse::<u8>()
            .map_err(|_| invalid(format!("bad semester half in {s:?}")))?;
        Semester::new(year, half)
    }
}

impl Serialize for Semester {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Semester id (`"yyyy-s"`) for a date.
pub fn semester(date: NaiveDate) -> String {
    Semester::containing(date).to_string()
}
