//! Static snapshot: every view pre-computed for the `all` slice and each
//! single-dimension slice, written as one JSON file per view.

pub mod select;

pub use select::{SliceDimension, SLICE_PRIORITY};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analytics::DashboardEngine;
use crate::error::Result;
use crate::models::{
    CohortHeatmap, ConversionTrendResponse, DevelopmentLocation, FilterCriteria, FilterOptions,
    FunnelResponse, FunnelStage, MetricsResponse,
};

pub const FILTER_OPTIONS_FILE: &str = "filter-options.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const FUNNEL_FILE: &str = "funnel.json";
pub const TRENDS_FILE: &str = "trends.json";
pub const COHORTS_FILE: &str = "cohorts.json";
pub const DEVELOPMENTS_FILE: &str = "developments.json";

/// A view computed globally and per single filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sliced<T> {
    pub all: T,
    #[serde(default = "BTreeMap::new")]
    pub by_region: BTreeMap<String, T>,
    #[serde(default = "BTreeMap::new")]
    pub by_desarrollo: BTreeMap<String, T>,
    #[serde(default = "BTreeMap::new")]
    pub by_year: BTreeMap<String, T>,
    #[serde(default = "BTreeMap::new")]
    pub by_week: BTreeMap<String, T>,
}

impl<T> Sliced<T> {
    /// Compute `view` for `all` and for every value listed in `options`.
    pub fn compute(options: &FilterOptions, view: impl Fn(&FilterCriteria) -> T) -> Self {
        let keyed = |values: Vec<(String, FilterCriteria)>| -> BTreeMap<String, T> {
            values
                .into_iter()
                .map(|(key, criteria)| (key, view(&criteria)))
                .collect()
        };

        Self {
            all: view(&FilterCriteria::all()),
            by_region: keyed(
                options
                    .regiones
                    .iter()
                    .map(|r| (r.clone(), FilterCriteria::all().with_region(r.clone())))
                    .collect(),
            ),
            by_desarrollo: keyed(
                options
                    .desarrollos
                    .iter()
                    .map(|d| (d.clone(), FilterCriteria::all().with_development(d.clone())))
                    .collect(),
            ),
            by_year: keyed(
                options
                    .years
                    .iter()
                    .map(|y| (y.to_string(), FilterCriteria::all().with_year(*y)))
                    .collect(),
            ),
            by_week: keyed(
                options
                    .weeks
                    .iter()
                    .map(|w| (w.clone(), FilterCriteria::all().with_week(w.clone())))
                    .collect(),
            ),
        }
    }
}

pub type CohortHeatmaps = BTreeMap<FunnelStage, CohortHeatmap>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub filter_options: FilterOptions,
    pub metrics: Sliced<MetricsResponse>,
    pub funnel: Sliced<FunnelResponse>,
    pub trends: Sliced<ConversionTrendResponse>,
    pub cohorts: Sliced<CohortHeatmaps>,
    pub developments: Vec<DevelopmentLocation>,
}

impl Snapshot {
    pub fn build(engine: &DashboardEngine<'_>) -> Self {
        let filter_options = engine.filter_options();
        debug!(
            regions = filter_options.regiones.len(),
            developments = filter_options.desarrollos.len(),
            years = filter_options.years.len(),
            weeks = filter_options.weeks.len(),
            "Building snapshot slices"
        );

        let metrics = Sliced::compute(&filter_options, |c| engine.metrics(c));
        let funnel = Sliced::compute(&filter_options, |c| engine.funnel(c));
        let trends = Sliced::compute(&filter_options, |c| engine.trends(c));
        let cohorts = Sliced::compute(&filter_options, |c| {
            FunnelStage::CONVERSIONS
                .into_iter()
                .map(|stage| (stage, engine.cohort_heatmap(c, stage)))
                .collect::<CohortHeatmaps>()
        });
        let developments = engine.developments(&FilterCriteria::all());

        Self {
            filter_options,
            metrics,
            funnel,
            trends,
            cohorts,
            developments,
        }
    }

    /// Write one pretty-printed JSON file per view into `dir`, creating it
    /// if needed. Returns the written paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let written = vec![
            write_json(dir, FILTER_OPTIONS_FILE, &self.filter_options)?,
            write_json(dir, METRICS_FILE, &self.metrics)?,
            write_json(dir, FUNNEL_FILE, &self.funnel)?,
            write_json(dir, TRENDS_FILE, &self.trends)?,
            write_json(dir, COHORTS_FILE, &self.cohorts)?,
            write_json(dir, DEVELOPMENTS_FILE, &self.developments)?,
        ];

        info!(dir = %dir.display(), files = written.len(), "Snapshot written");
        Ok(written)
    }
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut out = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    debug!(file = %path.display(), "Wrote snapshot file");
    Ok(path)
}
