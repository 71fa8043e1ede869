//! Metric modules.
//!
//! Each module computes one quality category over a data frame.

pub mod completeness;
pub mod consistency;
pub mod uniqueness;
pub mod validity;

use polars::prelude::DataFrame;

/// Ratio of `count` to the frame height; callers guard against empty frames.
pub(crate) fn fraction(count: usize, df: &DataFrame) -> f64 {
    count as f64 / df.height() as f64
}
