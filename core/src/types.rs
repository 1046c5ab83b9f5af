use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::calendar::midnight;
use crate::error::{Result, StatsError};

/// Denominators below this are treated as zero (seconds of science time or
/// night length).
pub const RATIO_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

/// `100 * numerator / denominator`, NaN when the denominator is ~0.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < RATIO_EPSILON || !denominator.is_finite() {
        f64::NAN
    } else {
        100.0 * numerator / denominator
    }
}

/// Shared column handling for raw tables and binned series.
pub trait ColumnStore {
    fn row_count(&self) -> usize;
    fn columns(&self) -> &[Column];
    fn columns_mut(&mut self) -> &mut Vec<Column>;

    fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name.as_str()).collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns().iter().any(|c| c.name == name)
    }

    fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    /// Insert a column, replacing any column of the same name.
    fn set_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.row_count() {
            return Err(StatsError::LengthMismatch {
                column: name.to_string(),
                expected: self.row_count(),
                found: values.len(),
            });
        }
        let columns = self.columns_mut();
        match columns.iter_mut().find(|c| c.name == name) {
            Some(c) => c.values = values,
            None => columns.push(Column::new(name, values)),
        }
        Ok(())
    }

    /// Derive `target = 100 * numerator / denominator` row by row.
    fn derive_percentage(
        &mut self,
        target: &str,
        numerator: &str,
        denominator: &str,
    ) -> Result<()> {
        let values: Vec<f64> = self
            .column(numerator)?
            .iter()
            .zip(self.column(denominator)?)
            .map(|(n, d)| percentage(*n, *d))
            .collect();
        self.set_column(target, values)
    }

    /// Multiply a column in place, e.g. to turn seconds into hours.
    fn scale_column(&mut self, name: &str, factor: f64) -> Result<()> {
        let scaled: Vec<f64> = self.column(name)?.iter().map(|v| v * factor).collect();
        self.set_column(name, scaled)
    }

    fn fill_nan(&mut self, value: f64) {
        for c in self.columns_mut().iter_mut() {
            for v in c.values.iter_mut() {
                if v.is_nan() {
                    *v = value;
                }
            }
        }
    }
}

/// Per-night measurements, ordered by date.
///
/// Dates without a time of day are stored at midnight. Gaps between dates are
/// normal and never filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    date_column: String,
    dates: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl TimeSeriesTable {
    pub fn empty(date_column: impl Into<String>, value_columns: &[&str]) -> Self {
        Self {
            date_column: date_column.into(),
            dates: Vec::new(),
            columns: value_columns.iter().map(|n| Column::new(*n, Vec::new())).collect(),
        }
    }

    /// Build a table from a date axis and value columns. Rows are sorted by
    /// date; rows sharing a date keep their input order.
    pub fn from_columns(
        date_column: impl Into<String>,
        dates: Vec<NaiveDateTime>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let date_column = date_column.into();
        for c in &columns {
            if c.values.len() != dates.len() {
                return Err(StatsError::LengthMismatch {
                    column: c.name.clone(),
                    expected: dates.len(),
                    found: c.values.len(),
                });
            }
            if c.name == date_column {
                return Err(crate::error::invalid(format!(
                    "value column {:?} clashes with the date column",
                    c.name
                )));
            }
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        Ok(Self {
            dates: order.iter().map(|&i| dates[i]).collect(),
            columns: columns
                .into_iter()
                .map(|c| Column::new(c.name, order.iter().map(|&i| c.values[i]).collect()))
                .collect(),
            date_column,
        })
    }

    /// Same as [`TimeSeriesTable::from_columns`] for plain night dates.
    pub fn from_dates(
        date_column: impl Into<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        Self::from_columns(date_column, dates.into_iter().map(midnight).collect(), columns)
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Fails unless `name` is this table's date column.
    pub fn check_date_column(&self, name: &str) -> Result<()> {
        if name == self.date_column {
            Ok(())
        } else {
            Err(StatsError::UnknownColumn(name.to_string()))
        }
    }

    /// Keep the rows for which `keep(date, row_index)` holds.
    pub fn select_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(NaiveDateTime, usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(self.dates[i], i)).collect();
        Self {
            date_column: self.date_column.clone(),
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), rows.iter().map(|&i| c.values[i]).collect()))
                .collect(),
        }
    }

    /// Keep the rows whose value in `column` satisfies `keep`.
    pub fn retain_where<F>(&self, column: &str, keep: F) -> Result<Self>
    where
        F: Fn(f64) -> bool,
    {
        let values = self.column(column)?.to_vec();
        Ok(self.select_rows(|_, i| keep(values[i])))
    }

    /// Restrict to the given columns, in the given order.
    pub fn project(&self, names: &[&str]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|n| Ok(Column::new(*n, self.column(n)?.to_vec())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            date_column: self.date_column.clone(),
            dates: self.dates.clone(),
            columns,
        })
    }

    /// Outer join on the date column. Cells with no counterpart are NaN.
    ///
    /// Each date is expected at most once per side; duplicates pair up in order.
    pub fn outer_join(&self, other: &TimeSeriesTable) -> Result<Self> {
        if let Some(clash) = other.columns.iter().find(|c| self.has_column(&c.name)) {
            return Err(crate::error::invalid(format!(
                "column {:?} present in both tables",
                clash.name
            )));
        }

        let width_left = self.columns.len();
        let width_right = other.columns.len();
        let mut dates = Vec::with_capacity(self.len() + other.len());
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(self.len() + other.len());

        let (mut i, mut j) = (0, 0);
        while i < self.len() || j < other.len() {
            let left = self.dates.get(i).copied();
            let right = other.dates.get(j).copied();
            let mut row = Vec::with_capacity(width_left + width_right);
            match (left, right) {
                (Some(l), Some(r)) if l == r => {
                    row.extend(self.columns.iter().map(|c| c.values[i]));
                    row.extend(other.columns.iter().map(|c| c.values[j]));
                    dates.push(l);
                    i += 1;
                    j += 1;
                }
                (Some(l), r) if r.map_or(true, |r| l < r) => {
                    row.extend(self.columns.iter().map(|c| c.values[i]));
                    row.extend(std::iter::repeat(f64::NAN).take(width_right));
                    dates.push(l);
                    i += 1;
                }
                (_, Some(r)) => {
                    row.extend(std::iter::repeat(f64::NAN).take(width_left));
                    row.extend(other.columns.iter().map(|c| c.values[j]));
                    dates.push(r);
                    j += 1;
                }
                (_, None) => break,
            }
            rows.push(row);
        }

        let names = self.columns.iter().chain(other.columns.iter()).map(|c| c.name.clone());
        let columns = names
            .enumerate()
            .map(|(k, name)| Column::new(name, rows.iter().map(|r| r[k]).collect()))
            .collect();

        Ok(Self {
            date_column: self.date_column.clone(),
            dates,
            columns,
        })
    }
}

impl ColumnStore for TimeSeriesTable {
    fn row_count(&self) -> usize {
        self.dates.len()
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }
}

/// A table with one row per bin. `L` is the bucket label: a night or
/// mid-month date, or a [`crate::calendar::Semester`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedSeries<L> {
    label_column: String,
    labels: Vec<L>,
    columns: Vec<Column>,
}

impl<L: Copy + PartialEq> BinnedSeries<L> {
    pub(crate) fn new(
        label_column: impl Into<String>,
        labels: Vec<L>,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            label_column: label_column.into(),
            labels,
            columns,
        }
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn position(&self, label: L) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// Value of `column` in the bin labelled `label`, if that bin exists.
    pub fn value(&self, label: L, column: &str) -> Result<Option<f64>> {
        let values = self.column(column)?;
        Ok(self.position(label).map(|i| values[i]))
    }

    /// `(label, value)` pairs for one column.
    pub fn points(&self, column: &str) -> Result<Vec<(L, f64)>> {
        let values = self.column(column)?;
        Ok(self.labels.iter().copied().zip(values.iter().copied()).collect())
    }

    pub fn retain_labels<F>(&self, keep: F) -> Self
    where
        F: Fn(L) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(self.labels[i])).collect();
        Self {
            label_column: self.label_column.clone(),
            labels: rows.iter().map(|&i| self.labels[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), rows.iter().map(|&i| c.values[i]).collect()))
                .collect(),
        }
    }
}

impl BinnedSeries<NaiveDate> {
    /// Points on a timestamp axis (labels at midnight), as used by the
    /// running-average calculator.
    pub fn timeline(&self, column: &str) -> Result<Vec<(NaiveDateTime, f64)>> {
        Ok(self
            .points(column)?
            .into_iter()
            .map(|(d, v)| (midnight(d), v))
            .collect())
    }
}

impl<L> ColumnStore for BinnedSeries<L> {
    fn row_count(&self) -> usize {
        self.labels.len()
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }
}

/// Averaging interval, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window<X> {
    pub start: X,
    pub end: X,
}

impl<X: PartialOrd + std::fmt::Debug> Window<X> {
    pub fn new(start: X, end: X) -> Result<Self> {
        if start >= end {
            return Err(crate::error::invalid(format!(
                "window start {start:?} must be earlier than its end {end:?}"
            )));
        }
        Ok(Self { start, end })
    }
}
