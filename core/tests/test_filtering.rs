mod common;

use chrono::Duration;
use common::d;
use saltstats_core::calendar::midnight;
use saltstats_core::{
    filter_date_range, filter_day_before_date, filter_days_to_date, filter_week_to_date,
    value_last_night, value_last_week, Column, ColumnStore, TimeSeriesTable,
};

/// Nights 2016-05-01 .. 2016-05-20 with value = day of month, plus a late
/// observation on 2016-05-10.
fn table() -> TimeSeriesTable {
    let mut dates: Vec<_> = (1..=20).map(|day| midnight(d(2016, 5, day))).collect();
    let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
    dates.push(midnight(d(2016, 5, 10)) + Duration::hours(23));
    values.push(100.0);
    TimeSeriesTable::from_columns("Date", dates, vec![Column::new("Hours", values)]).unwrap()
}

#[test]
fn days_to_date_is_half_open_at_the_date() {
    let t = filter_days_to_date(&table(), d(2016, 5, 15), 3, "Date").unwrap();
    assert_eq!(t.column("Hours").unwrap(), &[12.0, 13.0, 14.0]);
}

#[test]
fn night_before_includes_late_timestamps() {
    let t = filter_day_before_date(&table(), d(2016, 5, 11), "Date").unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(value_last_night(&table(), d(2016, 5, 11), "Date", "Hours").unwrap(), 110.0);
}

#[test]
fn week_to_date() {
    let t = filter_week_to_date(&table(), d(2016, 5, 8), "Date").unwrap();
    assert_eq!(t.column("Hours").unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    assert_eq!(value_last_week(&table(), d(2016, 5, 8), "Date", "Hours").unwrap(), 28.0);
}

#[test]
fn no_rows_sum_to_zero() {
    assert_eq!(value_last_night(&table(), d(2016, 7, 1), "Date", "Hours").unwrap(), 0.0);
    assert_eq!(value_last_week(&table(), d(2016, 1, 1), "Date", "Hours").unwrap(), 0.0);
}

#[test]
fn nan_cells_are_skipped_in_sums() {
    let t = TimeSeriesTable::from_dates(
        "Date",
        vec![d(2016, 5, 1), d(2016, 5, 2)],
        vec![Column::new("Hours", vec![f64::NAN, 2.0])],
    )
    .unwrap();
    assert_eq!(value_last_week(&t, d(2016, 5, 3), "Date", "Hours").unwrap(), 2.0);
}

#[test]
fn invalid_arguments() {
    assert!(filter_days_to_date(&table(), d(2016, 5, 15), 0, "Date").is_err());
    assert!(filter_week_to_date(&table(), d(2016, 5, 15), "Night").is_err());
    assert!(value_last_night(&table(), d(2016, 5, 15), "Date", "Minutes").is_err());
}

#[test]
fn days_beyond_the_calendar_are_an_error() {
    assert!(filter_days_to_date(&table(), d(2016, 5, 15), i64::MAX / 1000, "Date").is_err());
    assert!(filter_days_to_date(&table(), d(2016, 5, 15), i64::MAX, "Date").is_err());
}

#[test]
fn date_range_is_inclusive() {
    let t = filter_date_range(&table(), d(2016, 5, 19), d(2016, 5, 20));
    assert_eq!(t.column("Hours").unwrap(), &[19.0, 20.0]);
}
