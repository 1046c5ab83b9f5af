pub mod binning;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod filtering;
pub mod metrics;
pub mod models;
pub mod panels;
pub mod recoating;
pub mod running_average;
pub mod source;
pub mod storage;
pub mod types;

pub use binning::{bin_by_date, bin_by_month, bin_by_semester, bin_by_semester_until, Aggregation};
pub use calendar::{day_range, month_range, semester, Semester};
pub use classify::{ColorScheme, Thresholds, Tier};
pub use config::{DashboardConfig, MetricSettings, DEFAULT_CONFIG};
pub use error::{Result, StatsError};
pub use filtering::{
    filter_date_range, filter_day_before_date, filter_days_to_date, filter_week_to_date,
    value_last_night, value_last_week,
};
pub use metrics::{percentage_of, required_average, required_for_semester_average, Metric};
pub use models::{BarSeries, DashboardReport, DialReading, MetricReport, SemesterReading};
pub use panels::{dashboard_report, metric_report, report_json};
pub use recoating::{segment_status, RecoatingRecord, SegmentStatus};
pub use running_average::{
    add_trend_curve, day_running_average, month_running_average, running_average_window,
    running_bin_average, Axis, TrendPoint,
};
pub use source::{DateRange, NightlySource, StaticNightlySource};
pub use storage::{load_config, save_config};
pub use types::{BinnedSeries, Column, ColumnStore, TimeSeriesTable, Window};
