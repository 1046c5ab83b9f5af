use chrono::NaiveDate;

use crate::calendar::day_range;
use crate::error::Result;
use crate::types::{ColumnStore, TimeSeriesTable};

/// Rows dated within the `days` days before `date` (`date` itself excluded).
pub fn filter_days_to_date(
    table: &TimeSeriesTable,
    date: NaiveDate,
    days: i64,
    date_column: &str,
) -> Result<TimeSeriesTable> {
    table.check_date_column(date_column)?;
    let (first, last) = day_range(date, days)?;
    Ok(table.select_rows(|t, _| (first..=last).contains(&t.date())))
}

/// Rows of the night before `date`.
pub fn filter_day_before_date(
    table: &TimeSeriesTable,
    date: NaiveDate,
    date_column: &str,
) -> Result<TimeSeriesTable> {
    filter_days_to_date(table, date, 1, date_column)
}

/// Rows of the seven nights before `date`.
pub fn filter_week_to_date(
    table: &TimeSeriesTable,
    date: NaiveDate,
    date_column: &str,
) -> Result<TimeSeriesTable> {
    filter_days_to_date(table, date, 7, date_column)
}

/// Rows dated from `start` to `end`, both included.
pub fn filter_date_range(
    table: &TimeSeriesTable,
    start: NaiveDate,
    end: NaiveDate,
) -> TimeSeriesTable {
    table.select_rows(|t, _| (start..=end).contains(&t.date()))
}

fn column_sum(table: &TimeSeriesTable, value_column: &str) -> Result<f64> {
    Ok(table.column(value_column)?.iter().filter(|v| !v.is_nan()).sum())
}

/// Sum of `value_column` over last night, 0 if there is no such row.
pub fn value_last_night(
    table: &TimeSeriesTable,
    date: NaiveDate,
    date_column: &str,
    value_column: &str,
) -> Result<f64> {
    column_sum(&filter_day_before_date(table, date, date_column)?, value_column)
}

/// Sum of `value_column` over the last seven nights, 0 if there are none.
pub fn value_last_week(
    table: &TimeSeriesTable,
    date: NaiveDate,
    date_column: &str,
    value_column: &str,
) -> Result<f64> {
    column_sum(&filter_week_to_date(table, date, date_column)?, value_column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn table() -> TimeSeriesTable {
        TimeSeriesTable::from_dates(
            "Date",
            vec![d(2016, 5, 1), d(2016, 5, 3), d(2016, 5, 8), d(2016, 5, 9), d(2016, 5, 10)],
            vec![Column::new("BlockCount", vec![1.0, 2.0, 4.0, 8.0, 16.0])],
        )
        .unwrap()
    }

    #[test]
    fn last_night_excludes_the_date_itself() {
        assert_eq!(value_last_night(&table(), d(2016, 5, 10), "Date", "BlockCount").unwrap(), 8.0);
    }

    #[test]
    fn last_week_covers_seven_nights() {
        // 3 May .. 9 May
        assert_eq!(value_last_week(&table(), d(2016, 5, 10), "Date", "BlockCount").unwrap(), 14.0);
    }

    #[test]
    fn missing_night_sums_to_zero() {
        assert_eq!(value_last_night(&table(), d(2016, 5, 5), "Date", "BlockCount").unwrap(), 0.0);
    }

    #[test]
    fn wrong_date_column_is_an_error() {
        assert!(value_last_night(&table(), d(2016, 5, 5), "Night", "BlockCount").is_err());
        assert!(filter_days_to_date(&table(), d(2016, 5, 5), 0, "Date").is_err());
    }
}
