//! Unit tests for configuration parsing

use std::collections::HashMap;
use std::path::PathBuf;

use funnelboard::config::{
    AnalyticsConfig, CohortCutoff, Config, DEFAULT_METRICS_DECIMALS, DEFAULT_PORT,
};

use crate::fixtures::date;

#[test]
fn cohort_cutoff_accepts_keywords_and_dates() {
    assert_eq!("dataset".parse::<CohortCutoff>().ok(), Some(CohortCutoff::DatasetMax));
    assert_eq!("".parse::<CohortCutoff>().ok(), Some(CohortCutoff::DatasetMax));
    assert_eq!("NOW".parse::<CohortCutoff>().ok(), Some(CohortCutoff::WallClock));
    assert_eq!(
        "2024-02-10".parse::<CohortCutoff>().ok(),
        Some(CohortCutoff::Fixed(date(2024, 2, 10)))
    );
}

#[test]
fn cohort_cutoff_rejects_garbage() {
    let err = "yesterday".parse::<CohortCutoff>().expect_err("not a cutoff");
    assert!(err.to_string().contains("COHORT_CUTOFF"));
}

#[test]
fn analytics_defaults() {
    let config = AnalyticsConfig::default();
    assert_eq!(config.cohort_cutoff, CohortCutoff::DatasetMax);
    assert_eq!(config.metrics_decimals, DEFAULT_METRICS_DECIMALS);
}

fn config_from(pairs: &[(&str, &str)]) -> funnelboard::Result<Config> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn empty_environment_uses_defaults() {
    let config = config_from(&[]).expect("defaults");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.environment, "development");
    assert!(!config.is_production());
    assert_eq!(config.data_path, PathBuf::from("data"));
    assert_eq!(config.export_dir, PathBuf::from("public/data"));
    assert_eq!(config.snapshot_dir, None);
    assert_eq!(config.analytics, AnalyticsConfig::default());
}

#[test]
fn export_dir_and_data_path_come_from_environment() {
    let config = config_from(&[
        ("EXPORT_DIR", "/srv/dashboard/data"),
        ("DATA_PATH", "/srv/input/Datos.xlsx"),
        ("DATA_DIR", "/ignored"),
    ])
    .expect("config");
    assert_eq!(config.export_dir, PathBuf::from("/srv/dashboard/data"));
    assert_eq!(config.data_path, PathBuf::from("/srv/input/Datos.xlsx"));
}

#[test]
fn data_dir_is_accepted_as_fallback() {
    let config = config_from(&[("DATA_DIR", "fixtures")]).expect("config");
    assert_eq!(config.data_path, PathBuf::from("fixtures"));
}

#[test]
fn invalid_port_is_rejected() {
    let err = config_from(&[("PORT", "eighty")]).expect_err("bad port");
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn metrics_decimals_are_bounded() {
    assert!(config_from(&[("METRICS_DECIMALS", "7")]).is_err());
    let config = config_from(&[("METRICS_DECIMALS", "4"), ("ENVIRONMENT", "Prod")])
        .expect("config");
    assert_eq!(config.analytics.metrics_decimals, 4);
    assert!(config.is_production());
}
