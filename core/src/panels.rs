//! Assembly of the per-metric dashboard panels.
//!
//! Every panel follows the same path: fetch the nights around the requested
//! date from a [`NightlySource`], derive the metric's percentage, bin by day,
//! month and semester, and colour the dial values.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use serde::Serialize;

use crate::binning::{bin_by_date, bin_by_month, bin_by_semester_until, Aggregation};
use crate::calendar::{
    average_month_length, day_range, days_after, days_before, midnight, month_range, Semester,
};
use crate::classify::ColorScheme;
use crate::config::{DashboardConfig, MetricSettings};
use crate::error::Result;
use crate::filtering::{value_last_night, value_last_week};
use crate::metrics::{
    percentage_of, required_for_semester_average, Metric, MetricDefinition, SourceTable,
};
use crate::models::{BarSeries, DashboardReport, DialReading, MetricReport, SemesterReading};
use crate::recoating::segment_status;
use crate::running_average::{
    add_trend_curve, day_running_average_at, month_running_average_at, TrendPoint,
};
use crate::source::{columns, DateRange, NightlySource};
use crate::types::{BinnedSeries, ColumnStore, TimeSeriesTable, RATIO_EPSILON};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

pub const MONTH_COLUMN: &str = "Month";
pub const SEMESTER_COLUMN: &str = "Semester";

/// Nights around `date` as needed by `metric`.
///
/// Efficiency metrics get their time column merged with the time breakdown;
/// nights without science time are dropped and remaining gaps count as 0.
pub fn fetch_metric_table(
    source: &dyn NightlySource,
    metric: Metric,
    date: NaiveDate,
    config: &DashboardConfig,
) -> Result<TimeSeriesTable> {
    let range = DateRange::new(
        days_before(date, config.lookback_days)?,
        days_after(date, config.lookahead_days)?,
    )?;
    let table = match metric.definition().source {
        SourceTable::BlockVisits => source.block_visits(range)?,
        SourceTable::TimeBreakdown => source.time_breakdown(range)?,
        SourceTable::ObservationTime => {
            with_science_time(source.observation_time(range)?, source, range)?
        }
        SourceTable::ShutterOpenTime => {
            with_science_time(source.shutter_open_time(range)?, source, range)?
        }
    };
    debug!(
        "{}: fetched {} nights from {} to {}",
        metric.name(),
        table.len(),
        range.start,
        range.end
    );
    Ok(table)
}

fn with_science_time(
    times: TimeSeriesTable,
    source: &dyn NightlySource,
    range: DateRange,
) -> Result<TimeSeriesTable> {
    let merged = times.outer_join(&source.time_breakdown(range)?)?;
    let mut kept = merged.retain_where(columns::SCIENCE_TIME, |t| t > RATIO_EPSILON)?;
    kept.fill_nan(0.0);
    Ok(kept)
}

fn dial(
    def: &MetricDefinition,
    scheme: &ColorScheme,
    value: f64,
    reference: Option<f64>,
) -> DialReading {
    let shown = match reference {
        Some(r) => percentage_of(value, r),
        None => Some(value),
    };
    let tier = scheme.classify(shown);
    DialReading {
        value: shown,
        minutes: def.reports_duration.then(|| value / SECONDS_PER_MINUTE),
        tier,
        color: tier.css_color(),
    }
}

/// Last-night and week-to-date dials.
fn dials(
    table: &TimeSeriesTable,
    metric: Metric,
    settings: &MetricSettings,
    date: NaiveDate,
) -> Result<(DialReading, DialReading)> {
    let def = metric.definition();
    let night = |column| value_last_night(table, date, columns::DATE, column);
    let week = |column| value_last_week(table, date, columns::DATE, column);

    let last_night = dial(
        &def,
        &settings.dial,
        night(def.value_column)?,
        def.reference_column.map(night).transpose()?,
    );
    let week_to_date = dial(
        &def,
        &settings.dial,
        week(def.value_column)?,
        def.reference_column.map(week).transpose()?,
    );
    if last_night.value.is_none() {
        warn!("{}: value for the night before {date} is undefined", metric.name());
    }
    Ok((last_night, week_to_date))
}

/// Add the percentage column to binned sums and convert the time column.
fn derive_columns<L>(
    binned: &mut BinnedSeries<L>,
    def: &MetricDefinition,
    seconds_per_unit: f64,
) -> Result<()> {
    if let (Some(reference), Some(target)) = (def.reference_column, def.percentage_column) {
        binned.derive_percentage(target, def.value_column, reference)?;
    }
    if def.reports_duration {
        binned.scale_column(def.value_column, 1.0 / seconds_per_unit)?;
    }
    Ok(())
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect()
}

fn trend_curve<F>(
    series: &[(NaiveDateTime, f64)],
    x_min: NaiveDateTime,
    x_max: NaiveDateTime,
    step: Duration,
    trend: F,
) -> Result<Vec<TrendPoint<NaiveDateTime>>>
where
    F: Fn(&[(NaiveDateTime, f64)], NaiveDateTime) -> Result<Option<f64>>,
{
    if x_min == x_max {
        return Ok(vec![TrendPoint { x: x_min, y: trend(series, x_min)? }]);
    }
    add_trend_curve(series, x_min, x_max, step, trend)
}

fn bar_series(
    shown: &BinnedSeries<NaiveDate>,
    def: &MetricDefinition,
    start: NaiveDate,
    end: NaiveDate,
    trend: Vec<TrendPoint<NaiveDateTime>>,
) -> Result<BarSeries> {
    let durations = if def.reports_duration {
        Some(defined(shown.column(def.value_column)?))
    } else {
        None
    };
    Ok(BarSeries {
        start,
        end,
        labels: shown.labels().to_vec(),
        values: defined(shown.column(def.plotted_column())?),
        durations,
        trend,
    })
}

/// One bar per night for the `days` nights before `date`.
pub fn daily_bars(
    table: &TimeSeriesTable,
    metric: Metric,
    date: NaiveDate,
    days: i64,
    today: NaiveDate,
) -> Result<BarSeries> {
    let def = metric.definition();
    let (start, end) = day_range(date, days)?;

    let mut binned = bin_by_date(table, columns::DATE, Aggregation::Sum)?;
    derive_columns(&mut binned, &def, SECONDS_PER_MINUTE)?;

    let series = binned.timeline(def.plotted_column())?;
    let trend = trend_curve(&series, midnight(start), midnight(end), Duration::days(1), |s, x| {
        day_running_average_at(s, x.date(), def.daily_ignore_missing, today)
    })?;

    let shown = binned.retain_labels(|d| d >= start && d <= end);
    bar_series(&shown, &def, start, end, trend)
}

/// One bar per month for the `months` months before the month of `date`.
///
/// Percentages are ratios of the monthly sums.
pub fn monthly_bars(
    table: &TimeSeriesTable,
    metric: Metric,
    date: NaiveDate,
    months: i32,
    today: NaiveDate,
) -> Result<BarSeries> {
    let def = metric.definition();
    let (start, end) = month_range(date, months)?;

    let mut binned = bin_by_month(table, columns::DATE, MONTH_COLUMN, Aggregation::Sum)?;
    derive_columns(&mut binned, &def, SECONDS_PER_HOUR)?;

    // month labels drift from the 15th by up to a few days
    let month = average_month_length();
    let first = midnight(start) - month / 2;
    let last = midnight(end) + month / 2;

    let series = binned.timeline(def.plotted_column())?;
    let trend = trend_curve(&series, midnight(start), last, month, |s, x| {
        month_running_average_at(s, x.date(), def.monthly_ignore_missing, today)
    })?;

    let (first, last) = (first.date(), last.date());
    let shown = binned.retain_labels(|d| d >= first && d <= last);
    bar_series(&shown, &def, start, end, trend)
}

/// Semester-to-date dial, counting the nights before `date`. Block visits
/// have none.
pub fn semester_to_date(
    table: &TimeSeriesTable,
    metric: Metric,
    settings: &MetricSettings,
    date: NaiveDate,
) -> Result<Option<SemesterReading>> {
    let def = metric.definition();
    let reference = match def.reference_column {
        Some(r) => r,
        None => return Ok(None),
    };

    let current = Semester::containing(date);
    let binned =
        bin_by_semester_until(table, date, columns::DATE, SEMESTER_COLUMN, Aggregation::Sum)?;
    let (value, seconds) = match binned.value(current, def.value_column)? {
        Some(seconds) => {
            let whole = binned.value(current, reference)?.unwrap_or(f64::NAN);
            (percentage_of(seconds, whole), Some(seconds))
        }
        None => {
            debug!("{}: no nights yet in semester {current}", metric.name());
            (None, None)
        }
    };

    let target = settings.semester_target;
    let required = target
        .map(|t| match value {
            Some(v) => required_for_semester_average(date, v, t),
            None => Ok(t),
        })
        .transpose()?;
    let tier = settings.semester_dial.classify(value);

    Ok(Some(SemesterReading {
        semester: current,
        value,
        hours: if def.reports_duration {
            seconds.map(|s| s / SECONDS_PER_HOUR)
        } else {
            None
        },
        target,
        required,
        tier,
        color: tier.css_color(),
    }))
}

/// All panels of one metric as seen on `today`.
pub fn metric_report(
    source: &dyn NightlySource,
    metric: Metric,
    date: NaiveDate,
    config: &DashboardConfig,
    today: NaiveDate,
) -> Result<MetricReport> {
    let table = fetch_metric_table(source, metric, date, config)?;
    let settings = config.settings(metric);

    let (last_night, week_to_date) = dials(&table, metric, &settings, date)?;
    Ok(MetricReport {
        metric,
        date,
        last_night,
        week_to_date,
        daily: daily_bars(&table, metric, date, config.daily_days, today)?,
        monthly: monthly_bars(&table, metric, date, config.monthly_months, today)?,
        semester_to_date: semester_to_date(&table, metric, &settings, date)?,
    })
}

/// Reports for every metric plus the mirror recoating status.
pub fn dashboard_report(
    source: &dyn NightlySource,
    date: NaiveDate,
    config: &DashboardConfig,
    today: NaiveDate,
) -> Result<DashboardReport> {
    let metrics = Metric::ALL
        .iter()
        .map(|m| metric_report(source, *m, date, config, today))
        .collect::<Result<Vec<_>>>()?;
    let mirror = segment_status(&source.mirror_recoatings()?, today)?;
    Ok(DashboardReport { date, metrics, mirror })
}

/// Any report as a JSON string. Undefined values appear as `null`.
pub fn report_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
