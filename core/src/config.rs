use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::classify::{ColorScheme, Thresholds};
use crate::metrics::Metric;

/// Dial colours and semester target of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSettings {
    /// Colouring of the last-night and week-to-date dials.
    pub dial: ColorScheme,
    /// Colouring of the semester-to-date dial.
    pub semester_dial: ColorScheme,
    /// Target semester average, in percent. No semester dial without it,
    /// except for the efficiency metrics which show the value alone.
    pub semester_target: Option<f64>,
}

impl MetricSettings {
    pub fn default_for(metric: Metric) -> Self {
        let gmb = |good, bad| ColorScheme::GoodMediocreBad(Thresholds::new(good, bad));
        match metric {
            Metric::BlockVisits | Metric::ShutterOpenEfficiency => Self {
                dial: ColorScheme::Neutral,
                semester_dial: ColorScheme::Neutral,
                semester_target: None,
            },
            Metric::ScienceTime => Self {
                dial: gmb(47.0, 37.0),
                semester_dial: gmb(49.0, 40.0),
                semester_target: Some(55.0),
            },
            Metric::EngineeringTime => Self {
                dial: gmb(13.0, 18.0),
                semester_dial: gmb(13.0, 18.0),
                semester_target: Some(5.0),
            },
            Metric::WeatherDowntime => Self {
                dial: gmb(40.0, 45.0),
                semester_dial: gmb(49.0, 40.0),
                semester_target: Some(55.0),
            },
            Metric::TelescopeDowntime => Self {
                dial: gmb(3.0, 6.0),
                semester_dial: gmb(3.0, 6.0),
                semester_target: Some(3.0),
            },
            Metric::OperationEfficiency => Self {
                dial: gmb(90.0, 80.0),
                semester_dial: gmb(90.0, 80.0),
                semester_target: Some(90.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Nights fetched before the requested date.
    pub lookback_days: i64,
    /// Nights fetched after the requested date.
    pub lookahead_days: i64,
    /// Extent of the daily bar view.
    pub daily_days: i64,
    /// Extent of the monthly bar view.
    pub monthly_months: i32,
    /// Per-metric overrides; metrics not listed use their defaults.
    pub metrics: BTreeMap<Metric, MetricSettings>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            lookback_days: 300,
            lookahead_days: 150,
            daily_days: 30,
            monthly_months: 6,
            metrics: Metric::ALL
                .iter()
                .map(|m| (*m, MetricSettings::default_for(*m)))
                .collect(),
        }
    }
}

impl DashboardConfig {
    pub fn settings(&self, metric: Metric) -> MetricSettings {
        self.metrics
            .get(&metric)
            .copied()
            .unwrap_or_else(|| MetricSettings::default_for(metric))
    }
}

pub static DEFAULT_CONFIG: Lazy<DashboardConfig> = Lazy::new(DashboardConfig::default);
