//! Aggregation engine: filter, funnel, cohort, metrics, trend and
//! development views over a [`RecordStore`].
//!
//! Every function here is pure over the store and the criteria; calling a
//! view twice with the same inputs yields the same output.

pub mod cohort;
pub mod developments;
pub mod filter;
pub mod funnel;
pub mod metrics;
pub mod options;
pub mod ratio;
pub mod trend;

pub use cohort::CohortAggregator;
pub use developments::DevelopmentAggregator;
pub use funnel::{FunnelAggregator, StageCounts};
pub use metrics::MetricsAggregator;
pub use trend::TrendAggregator;

use chrono::{Local, NaiveDate};

use crate::config::{AnalyticsConfig, CohortCutoff};
use crate::models::{
    CohortHeatmap, CohortSummary, ConversionTrendResponse, DevelopmentLocation, FilterCriteria,
    FilterOptions, FunnelResponse, FunnelStage, MetricsResponse,
};
use crate::store::RecordStore;

/// Borrowing facade that applies the configured knobs to each aggregator.
#[derive(Clone, Copy)]
pub struct DashboardEngine<'a> {
    store: &'a RecordStore,
    config: AnalyticsConfig,
}

impl<'a> DashboardEngine<'a> {
    pub fn new(store: &'a RecordStore, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    /// Observation date used to mask not-yet-observable cohort cells.
    pub fn cohort_cutoff(&self) -> Option<NaiveDate> {
        match self.config.cohort_cutoff {
            CohortCutoff::DatasetMax => self.store.max_date(),
            CohortCutoff::WallClock => Some(Local::now().date_naive()),
            CohortCutoff::Fixed(date) => Some(date),
        }
    }

    pub fn funnel(&self, criteria: &FilterCriteria) -> FunnelResponse {
        FunnelAggregator::aggregate(self.store.filtered_leads(criteria))
    }

    pub fn cohort_heatmap(&self, criteria: &FilterCriteria, stage: FunnelStage) -> CohortHeatmap {
        CohortAggregator::heatmap(self.store.filtered_leads(criteria), stage, self.cohort_cutoff())
    }

    pub fn cohort_summaries(&self, criteria: &FilterCriteria) -> Vec<CohortSummary> {
        CohortAggregator::summaries(self.store.filtered_leads(criteria))
    }

    pub fn metrics(&self, criteria: &FilterCriteria) -> MetricsResponse {
        MetricsAggregator::aggregate(
            self.store.filtered_leads(criteria),
            self.store.filtered_investments(criteria),
            self.config.metrics_decimals,
        )
    }

    pub fn trends(&self, criteria: &FilterCriteria) -> ConversionTrendResponse {
        TrendAggregator::aggregate(self.store.filtered_leads(criteria))
    }

    pub fn developments(&self, criteria: &FilterCriteria) -> Vec<DevelopmentLocation> {
        DevelopmentAggregator::locations(self.store, criteria)
    }

    pub fn filter_options(&self) -> FilterOptions {
        options::filter_options(self.store)
    }
}
