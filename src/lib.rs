//! Sales funnel dashboard engine.
//!
//! Loads lead, development and investment sheets into an immutable
//! [`store::RecordStore`], aggregates them into funnel, cohort, metrics,
//! trend and geographic views, and serves those views over HTTP or as a
//! static JSON snapshot tree.

pub mod analytics;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod snapshot;
pub mod store;
pub mod telemetry;

pub use error::{DashboardError, Result};
