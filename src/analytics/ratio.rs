//! Ratio and rounding helpers shared by every aggregator.
//!
//! All divisions by zero resolve to `0.0`, and nothing non-finite leaves
//! this module.

/// Decimal places for funnel, cohort and trend percentages.
pub const PERCENT_DECIMALS: u32 = 1;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let out = numerator / denominator;
    if out.is_finite() {
        out
    } else {
        0.0
    }
}

/// `part / whole * 100`, rounded.
pub fn percentage(part: u64, whole: u64, decimals: u32) -> f64 {
    round_to(safe_div(part as f64, whole as f64) * 100.0, decimals)
}
