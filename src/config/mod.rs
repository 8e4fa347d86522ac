//! Environment-driven configuration.
//!
//! Every value has a default so the server starts with an empty
//! environment; `.env` files are picked up by the binaries through `dotenvy`.

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{DashboardError, Result};

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_METRICS_DECIMALS: u32 = 2;
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_EXPORT_DIR: &str = "public/data";

/// Deployment environment name (`ENVIRONMENT`), lowercased.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

pub fn is_production_env(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Point in time a cohort cell must have reached to be observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CohortCutoff {
    /// Latest date found anywhere in the loaded lead records.
    #[default]
    DatasetMax,
    /// Today's date at aggregation time.
    WallClock,
    /// A fixed observation date.
    Fixed(NaiveDate),
}

impl FromStr for CohortCutoff {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "dataset" | "dataset_max" => Ok(Self::DatasetMax),
            "now" | "wall_clock" | "today" => Ok(Self::WallClock),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(Self::Fixed)
                .map_err(|e| DashboardError::Config {
                    key: "COHORT_CUTOFF",
                    message: format!("expected dataset, now or YYYY-MM-DD ({e})"),
                }),
        }
    }
}

/// Knobs consumed by the aggregators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub cohort_cutoff: CohortCutoff,
    /// Decimal places for money amounts and rates in the metrics view.
    pub metrics_decimals: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            cohort_cutoff: CohortCutoff::default(),
            metrics_decimals: DEFAULT_METRICS_DECIMALS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Workbook file, or a directory holding a workbook or the three CSV
    /// sheets.
    pub data_path: PathBuf,
    /// Pre-exported snapshot tree served under `/data` when set.
    pub snapshot_dir: Option<PathBuf>,
    /// Target directory of the `export-static` binary.
    pub export_dir: PathBuf,
    pub analytics: AnalyticsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| DashboardError::Config {
                key: "PORT",
                message: format!("`{raw}` is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let cohort_cutoff = match non_empty("COHORT_CUTOFF") {
            Some(raw) => raw.parse()?,
            None => CohortCutoff::default(),
        };

        let metrics_decimals = match non_empty("METRICS_DECIMALS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| DashboardError::Config {
                    key: "METRICS_DECIMALS",
                    message: format!("`{raw}` is not an integer between 0 and 6"),
                })?,
            None => DEFAULT_METRICS_DECIMALS,
        };

        Ok(Self {
            environment: non_empty("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string())
                .to_lowercase(),
            port,
            data_path: non_empty("DATA_PATH")
                .or_else(|| non_empty("DATA_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            snapshot_dir: non_empty("SNAPSHOT_DIR").map(PathBuf::from),
            export_dir: non_empty("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            analytics: AnalyticsConfig {
                cohort_cutoff,
                metrics_decimals,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }
}
