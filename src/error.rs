//! Errors raised at the edges of the engine: config, loading and export.
//!
//! Aggregation itself is total and never returns these.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("data file not found: {0}")]
    MissingFile(PathBuf),

    #[error("sheet `{sheet}` has no column matching any of {candidates:?}")]
    MissingColumn {
        sheet: &'static str,
        candidates: &'static [&'static str],
    },

    #[error("csv error in sheet `{sheet}`: {source}")]
    Csv {
        sheet: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no sheet {index} ({sheet})")]
    MissingSheet { index: usize, sheet: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
