use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::calendar::Semester;
use crate::classify::Tier;
use crate::metrics::Metric;
use crate::recoating::SegmentStatus;
use crate::running_average::TrendPoint;

/// A single-value dial (last night, week to date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialReading {
    /// Percentage, or the plain count for block visits. `None` if undefined.
    pub value: Option<f64>,
    /// Underlying time in minutes, for metrics reported as durations.
    pub minutes: Option<f64>,
    pub tier: Tier,
    pub color: &'static str,
}

/// Bars for consecutive days or months, plus the running-average trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub labels: Vec<NaiveDate>,
    /// Plotted value per bar; `None` where the ratio is undefined.
    pub values: Vec<Option<f64>>,
    /// Underlying time per bar (minutes for days, hours for months).
    pub durations: Option<Vec<Option<f64>>>,
    pub trend: Vec<TrendPoint<NaiveDateTime>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterReading {
    pub semester: Semester,
    pub value: Option<f64>,
    pub hours: Option<f64>,
    pub target: Option<f64>,
    /// Average needed over the rest of the semester to reach `target`.
    pub required: Option<f64>,
    pub tier: Tier,
    pub color: &'static str,
}

/// Everything the dashboard shows for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub metric: Metric,
    pub date: NaiveDate,
    pub last_night: DialReading,
    pub week_to_date: DialReading,
    pub daily: BarSeries,
    pub monthly: BarSeries,
    /// Missing for block visits.
    pub semester_to_date: Option<SemesterReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub date: NaiveDate,
    pub metrics: Vec<MetricReport>,
    pub mirror: Vec<SegmentStatus>,
}
