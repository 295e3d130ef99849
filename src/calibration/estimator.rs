//! pH estimation from L*a*b*
//!
//! Uses an injected [`CalibrationModel`] when one is available, otherwise a
//! fixed heuristic centered on neutral pH. Both branches round to two
//! decimals and clamp to [0, 14].

use std::path::Path;

use crate::calibration::CalibrationModel;
use crate::color::LabColor;
use crate::constants::ph;

/// pH estimator with an optional calibration model
///
/// Construct once and share; estimation is a pure function of the Lab input
/// and the model captured at construction.
#[derive(Debug, Clone, Default)]
pub struct PhEstimator {
    model: Option<CalibrationModel>,
}

impl PhEstimator {
    pub fn new(model: Option<CalibrationModel>) -> Self {
        Self { model }
    }

    /// Estimator that always uses the uncalibrated heuristic
    pub fn fallback() -> Self {
        Self { model: None }
    }

    /// Load the model at `path`, if any; missing or corrupt files fall back
    pub fn from_model_path(path: Option<&Path>) -> Self {
        Self::new(path.and_then(CalibrationModel::load))
    }

    pub fn model(&self) -> Option<&CalibrationModel> {
        self.model.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.model.is_some()
    }

    /// Estimated pH in [0, 14], rounded to two decimals
    pub fn estimate_ph(&self, lab: LabColor) -> f64 {
        estimate_ph(lab, self.model.as_ref())
    }
}

/// Estimate pH with an explicit (optional) model
pub fn estimate_ph(lab: LabColor, model: Option<&CalibrationModel>) -> f64 {
    let raw = match model {
        Some(model) => model.predict(lab),
        None => fallback_ph(lab),
    };
    finish(raw)
}

/// Uncalibrated placeholder mapping, not a validated chemical model
fn fallback_ph(lab: LabColor) -> f64 {
    ph::NEUTRAL
        + ph::FALLBACK_L_COEF * (lab.l - ph::FALLBACK_L_CENTER)
        + ph::FALLBACK_A_COEF * lab.a
        + ph::FALLBACK_B_COEF * lab.b
}

fn finish(raw: f64) -> f64 {
    // inf - inf from extreme coefficients
    if raw.is_nan() {
        tracing::warn!("pH estimate is not a number, reporting neutral");
        return ph::NEUTRAL;
    }
    let scale = 10f64.powi(ph::DECIMALS);
    // Adding zero turns a rounded -0.0 into 0.0
    ((raw * scale).round() / scale).clamp(ph::MIN, ph::MAX) + 0.0
}
