#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use saltstats_core::{Column, TimeSeriesTable};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// Read a fixture whose first column holds `%Y-%m-%d %H:%M:%S` timestamps and
/// whose remaining columns are numbers.
pub fn read_table(name: &str) -> TimeSeriesTable {
    let mut reader = csv::Reader::from_path(fixture_path(name)).expect("fixture should open");
    let headers = reader.headers().expect("fixture has a header").clone();

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];
    for record in reader.records() {
        let record = record.expect("valid csv row");
        let timestamp = NaiveDateTime::parse_from_str(&record[0], "%Y-%m-%d %H:%M:%S");
        dates.push(timestamp.expect("timestamp"));
        for (k, cell) in record.iter().skip(1).enumerate() {
            values[k].push(cell.parse().expect("number"));
        }
    }

    let columns = headers.iter().skip(1).zip(values).map(|(n, v)| Column::new(n, v)).collect();
    TimeSeriesTable::from_columns(&headers[0], dates, columns).expect("consistent fixture")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}
