//! Grouping of per-night rows into day, month and semester bins.
//!
//! Days, months and semesters start at midnight. Callers working with
//! noon-to-noon nights shift their timestamps before binning.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;
use ordered_float::OrderedFloat;

use crate::calendar::{average_month_length, midnight, months_between, Semester, MID_MONTH_DAY};
use crate::error::{invalid, Result};
use crate::types::{BinnedSeries, Column, ColumnStore, TimeSeriesTable};

/// Aggregation applied to the values of one column within a bin.
///
/// The built-in variants skip NaN cells. An all-NaN group sums to 0 and
/// gives NaN for the other statistics.
#[derive(Debug, Clone, Copy, Default)]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Median,
    Min,
    Max,
    /// Number of rows in the bin, NaN or not.
    Count,
    Custom(fn(&[f64]) -> f64),
}

impl Aggregation {
    pub fn apply(&self, values: &[f64]) -> f64 {
        let present = || values.iter().copied().filter(|v| !v.is_nan());
        match self {
            Aggregation::Count => values.len() as f64,
            Aggregation::Custom(f) => f(values),
            Aggregation::Sum => present().sum(),
            _ if present().next().is_none() => f64::NAN,
            Aggregation::Mean => present().sum::<f64>() / present().count() as f64,
            Aggregation::Median => {
                let mut xs: Vec<OrderedFloat<f64>> = present().map(OrderedFloat).collect();
                xs.sort();
                let n = xs.len();
                if n % 2 == 1 {
                    xs[n / 2].0
                } else {
                    (xs[n / 2 - 1].0 + xs[n / 2].0) / 2.0
                }
            }
            Aggregation::Min => present().map(OrderedFloat).min().map_or(f64::NAN, |v| v.0),
            Aggregation::Max => present().map(OrderedFloat).max().map_or(f64::NAN, |v| v.0),
        }
    }
}

/// Group rows by `key` and aggregate every value column per group.
/// Groups come out in ascending key order.
fn group_rows<K, F>(table: &TimeSeriesTable, key: F, agg: Aggregation) -> (Vec<K>, Vec<Column>)
where
    K: Ord + Copy,
    F: Fn(NaiveDateTime) -> K,
{
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, date) in table.dates().iter().enumerate() {
        groups.entry(key(*date)).or_default().push(i);
    }

    let keys: Vec<K> = groups.keys().copied().collect();
    let columns = table
        .columns()
        .iter()
        .map(|c| {
            let values = groups
                .values()
                .map(|rows| {
                    let group: Vec<f64> = rows.iter().map(|&i| c.values[i]).collect();
                    agg.apply(&group)
                })
                .collect();
            Column::new(c.name.clone(), values)
        })
        .collect();

    (keys, columns)
}

/// Bin rows by calendar day, dropping the time of day.
pub fn bin_by_date(
    table: &TimeSeriesTable,
    date_column: &str,
    agg: Aggregation,
) -> Result<BinnedSeries<NaiveDate>> {
    table.check_date_column(date_column)?;
    let (days, columns) = group_rows(table, |t| t.date(), agg);
    debug!("binned {} rows into {} days", table.len(), days.len());
    Ok(BinnedSeries::new(date_column, days, columns))
}

/// Bin rows by calendar month.
///
/// The label of a month is the 15th of the first binned month advanced by a
/// whole number of average month lengths, so that labels are equidistant.
pub fn bin_by_month(
    table: &TimeSeriesTable,
    date_column: &str,
    month_column: &str,
    agg: Aggregation,
) -> Result<BinnedSeries<NaiveDate>> {
    table.check_date_column(date_column)?;
    let (months, columns) = group_rows(table, |t| (t.year(), t.month()), agg);

    let labels = match months.first() {
        None => Vec::new(),
        Some(&(first_year, first_month)) => {
            let anchor = NaiveDate::from_ymd_opt(first_year, first_month, MID_MONTH_DAY)
                .map(midnight)
                .ok_or_else(|| {
                    invalid(format!("no mid-month date for {first_year}-{first_month}"))
                })?;
            months
                .iter()
                .map(|&(y, m)| {
                    let n = months_between(first_year, first_month, y, m);
                    (anchor + average_month_length() * n).date()
                })
                .collect()
        }
    };

    debug!("binned {} rows into {} months", table.len(), labels.len());
    Ok(BinnedSeries::new(month_column, labels, columns))
}

/// Bin rows by observing semester.
pub fn bin_by_semester(
    table: &TimeSeriesTable,
    date_column: &str,
    semester_column: &str,
    agg: Aggregation,
) -> Result<BinnedSeries<Semester>> {
    table.check_date_column(date_column)?;
    let (semesters, columns) = group_rows(table, |t| Semester::containing(t.date()), agg);
    debug!("binned {} rows into {} semesters", table.len(), semesters.len());
    Ok(BinnedSeries::new(semester_column, semesters, columns))
}

/// Semester bins built only from rows dated before `cutoff`.
pub fn bin_by_semester_until(
    table: &TimeSeriesTable,
    cutoff: NaiveDate,
    date_column: &str,
    semester_column: &str,
    agg: Aggregation,
) -> Result<BinnedSeries<Semester>> {
    let before = table.select_rows(|t, _| t.date() < cutoff);
    bin_by_semester(&before, date_column, semester_column, agg)
}
