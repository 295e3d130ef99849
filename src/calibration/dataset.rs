//! Calibration samples gathered from reference photos
//!
//! A reference photo of a solution with known pH is averaged over its
//! central patch by the capture side; the filename carries the pH label
//! (e.g. `sample_pH7.0_1.jpg`). The resulting samples feed
//! [`CalibrationModel::fit`](crate::calibration::CalibrationModel::fit).

use serde::{Deserialize, Serialize};

use crate::color::{ColorConverter, LabColor, RgbSample};

/// One reference measurement: averaged color and its pH label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub filename: String,
    pub rgb: RgbSample,
    pub lab: LabColor,
    /// `None` when the filename carries no number
    pub ph: Option<f64>,
}

impl CalibrationSample {
    /// Build a sample from fractional channel averages
    ///
    /// Lab is computed from the unrounded averages; `rgb` holds the rounded
    /// (and clamped) sample.
    pub fn from_average(filename: impl Into<String>, r: f64, g: f64, b: f64) -> Self {
        let filename = filename.into();
        let ph = ph_from_filename(&filename);
        Self {
            rgb: RgbSample::from_averages(r, g, b),
            lab: ColorConverter::new().averages_to_lab(r, g, b),
            ph,
            filename,
        }
    }
}

/// First decimal number in a filename, taken as its pH label
///
/// `sample_pH7.0_1.jpg` → `Some(7.0)`, `buffer-4.jpg` → `Some(4.0)`,
/// `blank.jpg` → `None`.
pub fn ph_from_filename(name: &str) -> Option<f64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let rest = &name[start..];

    let mut end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if rest[end..].starts_with('.') {
        let fraction = &rest[end + 1..];
        let digits = fraction.find(|c: char| !c.is_ascii_digit()).unwrap_or(fraction.len());
        if digits > 0 {
            end += 1 + digits;
        }
    }

    rest[..end].parse().ok()
}
