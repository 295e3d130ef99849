//! Water-quality interpretation module
//!
//! This module holds the externally measured quality metrics and the
//! interpreter that turns them into a verdict with recommendations.

pub mod interpreter;
pub mod metrics;

pub use interpreter::{Interpretation, QualityInterpreter, WaterStatus};
pub use metrics::QualityMetrics;
