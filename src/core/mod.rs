//! Transport layer around the aggregation engine.

pub mod http;

pub use http::*;
