//! Externally measured quality metrics

use serde::{Deserialize, Serialize};

use crate::constants::quality::{PERCENT_MAX, PERCENT_MIN};

/// Clarity, turbidity and purity as percentages in [0, 100]
///
/// Produced by the measurement step outside this crate. Values are clamped
/// on construction and on deserialization; NaN becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMetrics")]
pub struct QualityMetrics {
    pub clarity: f64,
    pub turbidity: f64,
    pub purity: f64,
}

#[derive(Deserialize)]
struct RawMetrics {
    clarity: f64,
    turbidity: f64,
    purity: f64,
}

impl From<RawMetrics> for QualityMetrics {
    fn from(raw: RawMetrics) -> Self {
        QualityMetrics::new(raw.clarity, raw.turbidity, raw.purity)
    }
}

impl QualityMetrics {
    pub fn new(clarity: f64, turbidity: f64, purity: f64) -> Self {
        Self {
            clarity: clamp_percent(clarity),
            turbidity: clamp_percent(turbidity),
            purity: clamp_percent(purity),
        }
    }

    /// Turbidity flipped so that higher is better, like the other two metrics
    pub fn water_clearness(&self) -> f64 {
        PERCENT_MAX - self.turbidity
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}
