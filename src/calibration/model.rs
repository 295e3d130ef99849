//! Linear calibration model mapping L*a*b* to pH
//!
//! Loading is a soft-fail boundary: a missing or malformed model file
//! yields `None` and the estimator falls back to its built-in heuristic.
//! Only structural presence of `intercept` and `coefficients` is checked.

use std::fs;
use std::io;
use std::path::Path;

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationSample;
use crate::color::LabColor;
use crate::constants::MIN_CALIBRATION_SAMPLES;
use crate::{Result, ScanError};

/// `pH = intercept + L·coef.L + a·coef.a + b·coef.b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub intercept: f64,
    /// Older model files name this field `coefs`
    #[serde(alias = "coefs")]
    pub coefficients: LabCoefficients,
}

/// Per-channel weights; an absent (or null) weight contributes nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabCoefficients {
    #[serde(rename = "L", default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

impl LabCoefficients {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self {
            l: Some(l),
            a: Some(a),
            b: Some(b),
        }
    }
}

impl CalibrationModel {
    pub fn new(intercept: f64, coefficients: LabCoefficients) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Raw (unclamped, unrounded) model output
    pub fn predict(&self, lab: LabColor) -> f64 {
        let c = &self.coefficients;
        self.intercept
            + c.l.unwrap_or(0.0) * lab.l
            + c.a.unwrap_or(0.0) * lab.a
            + c.b.unwrap_or(0.0) * lab.b
    }

    /// Parse a model from JSON; `None` if the document is not a model
    pub fn from_json_str(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!("Ignoring malformed calibration model: {}", e);
                None
            }
        }
    }

    /// Load a model file; never fails, absence or corruption yields `None`
    pub fn load(path: &Path) -> Option<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let model = Self::from_json_str(&content)?;
                tracing::debug!("Loaded calibration model from {}", path.display());
                Some(model)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No calibration model at {}, using fallback", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Cannot read calibration model {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save the model in the format [`CalibrationModel::load`] reads
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::serialization("encoding calibration model", e))?;
        fs::write(path, json).map_err(|e| ScanError::config(format!("writing {}", path.display()), e))
    }

    /// Fit a model by ordinary least squares over the labelled samples
    ///
    /// Samples without a pH label are skipped. Requires at least
    /// [`MIN_CALIBRATION_SAMPLES`] labelled samples whose Lab values are not
    /// collinear.
    pub fn fit(samples: &[CalibrationSample]) -> Result<Self> {
        let labelled: Vec<(LabColor, f64)> = samples
            .iter()
            .filter_map(|s| s.ph.map(|ph| (s.lab, ph)))
            .collect();

        if labelled.len() < MIN_CALIBRATION_SAMPLES {
            return Err(ScanError::Calibration {
                reason: format!(
                    "need at least {} labelled samples, got {}",
                    MIN_CALIBRATION_SAMPLES,
                    labelled.len()
                ),
            });
        }

        // Normal equations: (XᵀX) β = Xᵀy with rows [1, L, a, b]
        let mut xtx = Matrix4::<f64>::zeros();
        let mut xty = Vector4::<f64>::zeros();
        for (lab, ph) in &labelled {
            let row = Vector4::new(1.0, lab.l, lab.a, lab.b);
            xtx += row * row.transpose();
            xty += row * *ph;
        }

        let beta = xtx
            .lu()
            .solve(&xty)
            .filter(|beta| beta.iter().all(|v| v.is_finite()))
            .ok_or_else(|| ScanError::Calibration {
                reason: "samples do not span L, a and b (singular system)".to_string(),
            })?;

        tracing::info!(
            "Fitted calibration model from {} samples: intercept={:.4} L={:.4} a={:.4} b={:.4}",
            labelled.len(),
            beta[0],
            beta[1],
            beta[2],
            beta[3]
        );

        Ok(Self::new(beta[0], LabCoefficients::new(beta[1], beta[2], beta[3])))
    }
}
