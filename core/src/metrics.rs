use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::Semester;
use crate::error::Result;
use crate::source::columns;
use crate::types::RATIO_EPSILON;

/// `100 * part / whole`, `None` when `whole` is ~0.
pub fn percentage_of(part: f64, whole: f64) -> Option<f64> {
    if whole.is_finite() && whole.abs() >= RATIO_EPSILON && part.is_finite() {
        Some(100.0 * part / whole)
    } else {
        None
    }
}

/// Average needed over the remaining days to end on `target`.
///
/// Weighted-average inversion of `average` over `elapsed_days`. With no days
/// left the target itself is returned. Negative requirements are clamped to 0.
pub fn required_average(average: f64, target: f64, elapsed_days: i64, remaining_days: i64) -> f64 {
    if remaining_days <= 0 {
        return target;
    }
    let total = (elapsed_days + remaining_days) as f64;
    let required = (target * total - average * elapsed_days as f64) / remaining_days as f64;
    required.max(0.0)
}

/// [`required_average`] for the semester containing `date`, counting the
/// nights before `date` as elapsed.
pub fn required_for_semester_average(date: NaiveDate, average: f64, target: f64) -> Result<f64> {
    let semester = Semester::containing(date);
    let elapsed = (date - semester.first_day()?).num_days();
    let remaining = semester.length_days()? - elapsed;
    Ok(required_average(average, target, elapsed, remaining))
}

/// Which source table a metric is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    BlockVisits,
    TimeBreakdown,
    /// Observation time merged with the time breakdown.
    ObservationTime,
    /// Shutter open time merged with the time breakdown.
    ShutterOpenTime,
}

/// Dashboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    BlockVisits,
    ScienceTime,
    EngineeringTime,
    OperationEfficiency,
    ShutterOpenEfficiency,
    TelescopeDowntime,
    WeatherDowntime,
}

/// How one metric is derived from its source table.
#[derive(Debug, Clone, Copy)]
pub struct MetricDefinition {
    pub source: SourceTable,
    /// Summed quantity (a count, or a time in seconds).
    pub value_column: &'static str,
    /// Reference time for percentages; `None` for plain counts.
    pub reference_column: Option<&'static str>,
    /// Name of the derived percentage column.
    pub percentage_column: Option<&'static str>,
    /// Whether `value_column` is a time shown in minutes/hours next to the
    /// percentage.
    pub reports_duration: bool,
    pub daily_ignore_missing: bool,
    pub monthly_ignore_missing: bool,
}

impl MetricDefinition {
    /// Column the bars and trend curve are drawn from.
    pub fn plotted_column(&self) -> &'static str {
        self.percentage_column.unwrap_or(self.value_column)
    }

    pub fn is_efficiency(&self) -> bool {
        matches!(self.source, SourceTable::ObservationTime | SourceTable::ShutterOpenTime)
    }
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::BlockVisits,
        Metric::ScienceTime,
        Metric::EngineeringTime,
        Metric::OperationEfficiency,
        Metric::ShutterOpenEfficiency,
        Metric::TelescopeDowntime,
        Metric::WeatherDowntime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::BlockVisits => "block_visits",
            Metric::ScienceTime => "science_time",
            Metric::EngineeringTime => "engineering_time",
            Metric::OperationEfficiency => "operation_efficiency",
            Metric::ShutterOpenEfficiency => "shutter_open_efficiency",
            Metric::TelescopeDowntime => "telescope_downtime",
            Metric::WeatherDowntime => "weather_downtime",
        }
    }

    pub fn definition(&self) -> MetricDefinition {
        let night_share = |value_column, percentage_column| MetricDefinition {
            source: SourceTable::TimeBreakdown,
            value_column,
            reference_column: Some(columns::NIGHT_LENGTH),
            percentage_column: Some(percentage_column),
            reports_duration: true,
            daily_ignore_missing: false,
            monthly_ignore_missing: false,
        };
        let efficiency = |source, value_column, percentage_column| MetricDefinition {
            source,
            value_column,
            reference_column: Some(columns::SCIENCE_TIME),
            percentage_column: Some(percentage_column),
            reports_duration: false,
            daily_ignore_missing: true,
            monthly_ignore_missing: false,
        };

        match self {
            Metric::BlockVisits => MetricDefinition {
                source: SourceTable::BlockVisits,
                value_column: columns::BLOCK_COUNT,
                reference_column: None,
                percentage_column: None,
                reports_duration: false,
                daily_ignore_missing: false,
                monthly_ignore_missing: false,
            },
            Metric::ScienceTime => night_share(columns::SCIENCE_TIME, "ScienceTimePercentage"),
            Metric::EngineeringTime => {
                night_share(columns::ENGINEERING_TIME, "EngineeringTimePercentage")
            }
            Metric::WeatherDowntime => {
                night_share(columns::TIME_LOST_TO_WEATHER, "TimeLostToWeatherPercentage")
            }
            Metric::TelescopeDowntime => {
                night_share(columns::TIME_LOST_TO_PROBLEMS, "TimeLostToProblemsPercentage")
            }
            Metric::OperationEfficiency => {
                efficiency(SourceTable::ObservationTime, columns::OBS_TIME, "OperationEfficiency")
            }
            Metric::ShutterOpenEfficiency => {
                let column = columns::SHUTTER_OPEN_TIME;
                efficiency(SourceTable::ShutterOpenTime, column, "ShutterOpenEfficiency")
            }
        }
    }
}
