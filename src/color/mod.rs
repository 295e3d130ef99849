//! Color samples and conversion
//!
//! This module holds the averaged RGB sample type, its CIE L*a*b*
//! counterpart and the converter between them.

pub mod conversion;
pub mod sample;

pub use conversion::{rgb_to_lab, ColorConverter};
pub use sample::{LabColor, RgbSample};
