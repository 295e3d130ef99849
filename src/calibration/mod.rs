//! Calibration and pH estimation module
//!
//! This module loads optional linear calibration models, estimates pH from
//! Lab colors, and fits new models from labelled reference samples.

pub mod dataset;
pub mod estimator;
pub mod model;

pub use dataset::{ph_from_filename, CalibrationSample};
pub use estimator::{estimate_ph, PhEstimator};
pub use model::{CalibrationModel, LabCoefficients};
