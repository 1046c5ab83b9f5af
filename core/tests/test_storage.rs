use std::fs;

use saltstats_core::metrics::Metric;
use saltstats_core::{
    load_config, save_config, ColorScheme, DashboardConfig, StatsError, Thresholds, DEFAULT_CONFIG,
};

#[test]
fn test_save_and_load_config() {
    let path = std::env::temp_dir().join("saltstats_config_roundtrip.json");

    let mut config = DashboardConfig {
        daily_days: 14,
        monthly_months: 12,
        ..Default::default()
    };
    if let Some(settings) = config.metrics.get_mut(&Metric::TelescopeDowntime) {
        settings.dial = ColorScheme::GoodMediocreBad(Thresholds::new(2.0, 5.0));
        settings.semester_target = Some(2.0);
    }

    save_config(&config, &path).expect("could not save config");
    let loaded = load_config(&path).expect("could not load config");

    assert_eq!(loaded, config);
    assert_eq!(loaded.settings(Metric::TelescopeDowntime).semester_target, Some(2.0));

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("saltstats_no_such_config.json");
    fs::remove_file(&path).ok();

    let loaded = load_config(&path).unwrap();
    assert_eq!(&loaded, &*DEFAULT_CONFIG);
}

#[test]
fn parse_errors_name_the_field() {
    let path = std::env::temp_dir().join("saltstats_bad_config.json");
    fs::write(&path, r#"{ "lookback_days": "three hundred" }"#).unwrap();

    match load_config(&path) {
        Err(StatsError::Json(e)) => assert_eq!(e.path().to_string(), "lookback_days"),
        other => panic!("expected a parse error, got {other:?}"),
    }

    fs::remove_file(&path).ok();
}
