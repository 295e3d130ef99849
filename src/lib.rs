//! # Water Scan
//!
//! A Rust crate for estimating water quality from the color of a liquid
//! sample photographed with a handheld device.
//!
//! This library provides:
//! - Deterministic sRGB → CIE L*a*b* conversion of an averaged sample
//! - pH estimation through a swappable linear calibration model, with a
//!   neutral-centered fallback when no model is available
//! - Classification into a water-quality verdict with recommendations
//! - A persistent, newest-first scan log with time windows and statistics
//!
//! Image capture, cropping and pixel averaging happen outside the crate;
//! the engine consumes the resulting RGB triple.
//!
//! ## Example
//!
//! ```rust,no_run
//! use water_scan::{QualityMetrics, RgbSample, ScanConfig, ScanEngine, ScanLogStore};
//!
//! let config = ScanConfig::default();
//! let engine = ScanEngine::from_config(&config)?;
//! let store = ScanLogStore::open(&config.storage);
//!
//! let analysis = engine.analyze(RgbSample::new(182, 196, 205), QualityMetrics::new(75.0, 65.0, 80.0));
//! println!("pH {:.2}: {}", analysis.ph, analysis.interpretation.summary);
//!
//! let record = store.add_scan(analysis.into_draft(chrono::Utc::now()))?;
//! println!("saved scan {}", record.id);
//! # Ok::<(), water_scan::ScanError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod quality;
pub mod store;

pub use calibration::{estimate_ph, CalibrationModel, CalibrationSample, LabCoefficients, PhEstimator};
pub use color::{rgb_to_lab, ColorConverter, LabColor, RgbSample};
pub use config::{CalibrationConfig, InterpretationConfig, ScanConfig, StorageConfig};
pub use error::{Result, ScanError};
pub use export::{export_rows, ExportRow};
pub use quality::{Interpretation, QualityInterpreter, QualityMetrics, WaterStatus};
pub use store::{GeoLocation, LogFilter, ScanDraft, ScanLogStore, ScanRecord, ScanStatistics};

/// Everything derived from one color sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanAnalysis {
    pub rgb: RgbSample,
    pub lab: LabColor,
    /// Estimated pH in [0, 14]
    pub ph: f64,
    pub metrics: QualityMetrics,
    pub interpretation: Interpretation,
}

impl ScanAnalysis {
    /// Draft scan record carrying this analysis, ready for the log store
    pub fn into_draft(self, timestamp: DateTime<Utc>) -> ScanDraft {
        ScanDraft::new(timestamp, self.rgb, self.metrics, self.interpretation)
            .with_lab(self.lab)
            .with_ph(self.ph)
    }
}

/// Converter, estimator and interpreter wired together
///
/// Holds no mutable state; share freely between threads.
#[derive(Debug, Clone, Default)]
pub struct ScanEngine {
    converter: ColorConverter,
    estimator: PhEstimator,
    interpreter: QualityInterpreter,
}

impl ScanEngine {
    pub fn new(estimator: PhEstimator, interpreter: QualityInterpreter) -> Self {
        Self {
            converter: ColorConverter::new(),
            estimator,
            interpreter,
        }
    }

    /// Build from configuration, loading the calibration model if one is configured
    ///
    /// A missing or corrupt model is not an error; only invalid
    /// interpretation settings are.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let estimator = PhEstimator::from_model_path(config.calibration.model_path.as_deref());
        let interpreter = QualityInterpreter::new(config.interpretation.clone())?;
        tracing::info!(
            "Scan engine ready (calibrated: {})",
            estimator.is_calibrated()
        );
        Ok(Self::new(estimator, interpreter))
    }

    pub fn estimator(&self) -> &PhEstimator {
        &self.estimator
    }

    pub fn interpreter(&self) -> &QualityInterpreter {
        &self.interpreter
    }

    /// Convert, estimate and interpret one sample
    pub fn analyze(&self, rgb: RgbSample, metrics: QualityMetrics) -> ScanAnalysis {
        let lab = self.converter.rgb_to_lab(rgb);
        let ph = self.estimator.estimate_ph(lab);
        let interpretation = self.interpreter.interpret(rgb, &metrics);
        ScanAnalysis {
            rgb,
            lab,
            ph,
            metrics,
            interpretation,
        }
    }
}

/// Analyze a sample with the uncalibrated estimator and default thresholds
pub fn analyze_sample(rgb: RgbSample, metrics: QualityMetrics) -> ScanAnalysis {
    ScanEngine::default().analyze(rgb, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serialization() {
        let analysis = analyze_sample(RgbSample::new(120, 140, 160), QualityMetrics::new(75.0, 65.0, 80.0));

        let json = serde_json::to_string(&analysis).unwrap();
        let deserialized: ScanAnalysis = serde_json::from_str(&json).unwrap();

        assert_eq!(analysis, deserialized);
    }

    #[test]
    fn test_into_draft_carries_lab_and_ph() {
        let analysis = analyze_sample(RgbSample::new(255, 255, 255), QualityMetrics::new(95.0, 5.0, 95.0));
        let now = Utc::now();
        let draft = analysis.clone().into_draft(now);

        assert_eq!(draft.timestamp, now);
        assert_eq!(draft.lab, Some(analysis.lab));
        assert_eq!(draft.ph, Some(analysis.ph));
        assert_eq!(draft.interpretation.status, WaterStatus::Excellent);
    }

    #[test]
    fn test_engine_uses_injected_model() {
        let model = CalibrationModel::new(3.0, LabCoefficients::default());
        let engine = ScanEngine::new(PhEstimator::new(Some(model)), QualityInterpreter::default());
        let analysis = engine.analyze(RgbSample::new(10, 200, 30), QualityMetrics::new(50.0, 50.0, 50.0));
        assert_eq!(analysis.ph, 3.0);
    }

    #[test]
    fn test_from_config_without_model_falls_back() {
        let engine = ScanEngine::from_config(&ScanConfig::default()).unwrap();
        assert!(!engine.estimator().is_calibrated());
    }
}
