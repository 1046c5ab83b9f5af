//! Windowed averages over binned series.
//!
//! Windows are centred on a date but never reach past "now": a bin that has
//! not happened yet must not pull the average down.

use std::fmt::Debug;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use log::debug;
use serde::Serialize;

use crate::calendar::{average_month_length, midnight};
use crate::error::{invalid, Result};
use crate::types::Window;

/// Fraction of a step by which a window is widened when selecting bins.
pub const WINDOW_MARGIN: f64 = 0.1;

/// Half-width of the daily running-average window, in days.
pub const DAY_HALF_WIDTH_DAYS: i64 = 7;

/// Position on the x axis of a series.
pub trait Axis: Copy + PartialOrd + Debug {
    type Step: Copy + Debug;

    /// `self + times * step`
    fn shift(self, step: Self::Step, times: f64) -> Self;

    /// `(end - start) / step`
    fn steps_between(start: Self, end: Self, step: Self::Step) -> f64;

    fn is_positive(step: Self::Step) -> bool;
}

impl Axis for f64 {
    type Step = f64;

    fn shift(self, step: f64, times: f64) -> f64 {
        self + times * step
    }

    fn steps_between(start: f64, end: f64, step: f64) -> f64 {
        (end - start) / step
    }

    fn is_positive(step: f64) -> bool {
        step > 0.0
    }
}

impl Axis for NaiveDateTime {
    type Step = Duration;

    /// Saturates at the ends of chrono's date range.
    fn shift(self, step: Duration, times: f64) -> NaiveDateTime {
        let millis = (step.num_milliseconds() as f64 * times).round() as i64;
        Duration::try_milliseconds(millis)
            .and_then(|delta| self.checked_add_signed(delta))
            .unwrap_or(if millis < 0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX })
    }

    fn steps_between(start: NaiveDateTime, end: NaiveDateTime, step: Duration) -> f64 {
        (end - start).num_milliseconds() as f64 / step.num_milliseconds() as f64
    }

    fn is_positive(step: Duration) -> bool {
        step.num_milliseconds() > 0
    }
}

fn check_step<X: Axis>(step: X::Step) -> Result<()> {
    if X::is_positive(step) {
        Ok(())
    } else {
        Err(invalid(format!("step must be positive, got {step:?}")))
    }
}

/// Window `[date - half_width, date + half_width]` with its end pulled back
/// in whole steps until it lies before `now`.
///
/// `None` if the window does not start before `now`, or if no full step of
/// it remains after clamping.
pub fn running_average_window<X: Axis>(
    date: X,
    half_width: X::Step,
    step: X::Step,
    now: X,
) -> Result<Option<Window<X>>> {
    check_step::<X>(step)?;
    let start = date.shift(half_width, -1.0);
    let mut end = date.shift(half_width, 1.0);
    if now <= start {
        return Ok(None);
    }
    if end >= now {
        let steps = X::steps_between(now, end, step).floor() + 1.0;
        end = end.shift(step, -steps);
        // rounding can leave the end on `now`
        if end >= now {
            end = end.shift(step, -1.0);
        }
    }
    if end >= now || end <= start {
        debug!("running-average window around {date:?} collapsed before {now:?}");
        return Ok(None);
    }
    Ok(Some(Window { start, end }))
}

/// Average of the bins inside `window`.
///
/// With `ignore_missing_values` only bins present in `series` count towards
/// the denominator; otherwise every step of the window does and absent bins
/// count as 0. NaN values are treated as absent. Returns 0 if there is
/// nothing to divide by.
pub fn running_bin_average<X: Axis>(
    series: &[(X, f64)],
    window: &Window<X>,
    step: X::Step,
    ignore_missing_values: bool,
) -> Result<f64> {
    if window.start >= window.end {
        return Err(invalid(format!(
            "window start {:?} must be earlier than its end {:?}",
            window.start, window.end
        )));
    }
    check_step::<X>(step)?;

    let lo = window.start.shift(step, -WINDOW_MARGIN);
    let hi = window.end.shift(step, WINDOW_MARGIN);
    let selected: Vec<f64> = series
        .iter()
        .filter(|(x, y)| *x >= lo && *x <= hi && !y.is_nan())
        .map(|(_, y)| *y)
        .collect();

    let bins = if ignore_missing_values {
        selected.len() as f64
    } else {
        X::steps_between(window.start, window.end, step).round() + 1.0
    };
    if bins <= 0.0 {
        return Ok(0.0);
    }
    Ok(selected.iter().sum::<f64>() / bins)
}

/// Daily trend value around `date` as seen on `today`.
pub fn day_running_average_at(
    series: &[(NaiveDateTime, f64)],
    date: NaiveDate,
    ignore_missing_values: bool,
    today: NaiveDate,
) -> Result<Option<f64>> {
    let step = Duration::days(1);
    let half_width = Duration::days(DAY_HALF_WIDTH_DAYS);
    let window = running_average_window(midnight(date), half_width, step, midnight(today))?;
    window
        .map(|w| running_bin_average(series, &w, step, ignore_missing_values))
        .transpose()
}

/// Daily trend value around `date`, clamped at the current local date.
pub fn day_running_average(
    series: &[(NaiveDateTime, f64)],
    date: NaiveDate,
    ignore_missing_values: bool,
) -> Result<Option<f64>> {
    day_running_average_at(series, date, ignore_missing_values, Local::now().date_naive())
}

/// Monthly trend value around `date` as seen on `today`. Months that have
/// not finished by the first day of `today`'s month are left out.
pub fn month_running_average_at(
    series: &[(NaiveDateTime, f64)],
    date: NaiveDate,
    ignore_missing_values: bool,
    today: NaiveDate,
) -> Result<Option<f64>> {
    let month = average_month_length();
    let now = midnight(today.with_day(1).unwrap_or(today));
    let window = running_average_window(midnight(date), month, month, now)?;
    window
        .map(|w| running_bin_average(series, &w, month, ignore_missing_values))
        .transpose()
}

/// Monthly trend value around `date`, clamped at the current local month.
pub fn month_running_average(
    series: &[(NaiveDateTime, f64)],
    date: NaiveDate,
    ignore_missing_values: bool,
) -> Result<Option<f64>> {
    month_running_average_at(series, date, ignore_missing_values, Local::now().date_naive())
}

/// One point of a trend curve. `y` is `None` where no average exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint<X> {
    pub x: X,
    pub y: Option<f64>,
}

/// Evaluate `trend(series, x)` for `x = x_min, x_min + step, ...` up to
/// `x_max`.
pub fn add_trend_curve<X, F>(
    series: &[(X, f64)],
    x_min: X,
    x_max: X,
    step: X::Step,
    trend: F,
) -> Result<Vec<TrendPoint<X>>>
where
    X: Axis,
    F: Fn(&[(X, f64)], X) -> Result<Option<f64>>,
{
    if x_min >= x_max {
        return Err(invalid(format!("x_min {x_min:?} must be less than x_max {x_max:?}")));
    }
    check_step::<X>(step)?;

    let mut curve = Vec::new();
    let mut k = 0.0;
    loop {
        let x = x_min.shift(step, k);
        if x > x_max {
            break;
        }
        curve.push(TrendPoint { x, y: trend(series, x)? });
        k += 1.0;
    }
    Ok(curve)
}
