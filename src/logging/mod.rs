//! Global `tracing` subscriber setup.
//!
//! Level comes from `RUST_LOG` (default `info`). Output goes to stderr so
//! that `export-static` keeps stdout free for piping.

use crate::config::{get_environment, is_production_env};
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log aggregation.
    Json,
    /// Coloured, human-readable lines.
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=json|pretty` wins; otherwise JSON in production.
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").map(|v| v.trim().to_lowercase()).as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Ok("text") => LogFormat::Pretty,
            _ if is_production_env(&get_environment()) => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_logging() {
    init_with(LogFormat::from_env());
}

/// A second install (tests, embedding) is ignored.
pub fn init_with(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(?format, "Logging initialized");
    }
}
