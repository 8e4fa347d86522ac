//! Shared data models spanning the engine layers.

pub mod filter;
pub mod lead;
pub mod stage;
pub mod views;

pub use filter::{FilterBody, FilterCriteria, FilterQuery};
pub use lead::{iso_week_label, Development, InvestmentRecord, LeadRecord, Region};
pub use stage::{FunnelStage, UnknownStage};
pub use views::{
    CohortHeatmap, CohortSummary, ConversionTrendPoint, ConversionTrendResponse,
    DevelopmentLocation, FilterOptions, FunnelResponse, FunnelStageData, MetricsResponse,
};
