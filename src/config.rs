//! Configuration structures for the water_scan engine.
//!
//! This module defines the tunable parameters for interpretation, the
//! location of the optional calibration model, and the scan log location.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use water_scan::ScanConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ScanConfig::from_json_file(Path::new("water_scan.json"))?;
//!
//! // Or use defaults
//! let config = ScanConfig::default();
//! # Ok::<(), water_scan::ScanError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`StorageConfig`]: where the scan log is persisted
//! - [`CalibrationConfig`]: optional calibration model file
//! - [`InterpretationConfig`]: composite weights and status breakpoints

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::quality;
use crate::{Result, ScanError};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub calibration: CalibrationConfig,

    #[serde(default)]
    pub interpretation: InterpretationConfig,
}

/// Scan log persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the scan log, newest first
    pub log_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("scans.json"),
        }
    }
}

/// Calibration model settings.
///
/// Without a model path (or when the file is missing or unreadable) the
/// estimator uses its uncalibrated fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default)]
    pub model_path: Option<PathBuf>,
}

/// Quality interpretation parameters.
///
/// The composite score is the weighted mean of clarity, inverted turbidity
/// and purity. Each status applies from its breakpoint upwards; anything
/// below `poor` is unsafe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretationConfig {
    #[serde(default)]
    pub weights: MetricWeights,

    #[serde(default)]
    pub breakpoints: StatusBreakpoints,
}

/// Relative weights of the metrics in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub clarity: f64,
    pub turbidity: f64,
    pub purity: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            clarity: quality::CLARITY_WEIGHT,
            turbidity: quality::TURBIDITY_WEIGHT,
            purity: quality::PURITY_WEIGHT,
        }
    }
}

impl MetricWeights {
    pub fn total(&self) -> f64 {
        self.clarity + self.turbidity + self.purity
    }
}

/// Minimum composite score for each status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBreakpoints {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for StatusBreakpoints {
    fn default() -> Self {
        Self {
            excellent: quality::EXCELLENT_MIN,
            good: quality::GOOD_MIN,
            fair: quality::FAIR_MIN,
            poor: quality::POOR_MIN,
        }
    }
}

impl InterpretationConfig {
    /// Reject weights and breakpoints that would break the ordering of statuses
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("weights.clarity", self.weights.clarity),
            ("weights.turbidity", self.weights.turbidity),
            ("weights.purity", self.weights.purity),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::invalid_parameter(name, value));
            }
        }
        if self.weights.total() <= 0.0 {
            return Err(ScanError::invalid_parameter("weights", "all zero"));
        }

        let b = &self.breakpoints;
        let ordered = [b.excellent, b.good, b.fair, b.poor];
        if ordered.iter().any(|v| !v.is_finite() || *v < quality::PERCENT_MIN || *v > quality::PERCENT_MAX) {
            return Err(ScanError::invalid_parameter(
                "breakpoints",
                format!("{:?} outside [0, 100]", ordered),
            ));
        }
        if !ordered.windows(2).all(|pair| pair[0] > pair[1]) {
            return Err(ScanError::invalid_parameter(
                "breakpoints",
                format!("{:?} not strictly descending", ordered),
            ));
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScanError::config(format!("reading {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ScanError::config(format!("parsing {}", path.display()), e))?;
        config.interpretation.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::serialization("encoding configuration", e))?;
        std::fs::write(path, json).map_err(|e| ScanError::config(format!("writing {}", path.display()), e))
    }
}
