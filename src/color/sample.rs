//! Color sample types
//!
//! `RgbSample` is the averaged region-of-interest color handed to the engine,
//! `LabColor` its CIE L*a*b* representation.

use serde::{Deserialize, Serialize};

use crate::{Result, ScanError};

/// 8-bit sRGB sample averaged over the region of interest
///
/// Out-of-range input is clamped, never rejected: fractional averages go
/// through [`RgbSample::from_averages`] and persisted samples deserialize
/// through the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRgb")]
pub struct RgbSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Unchecked wire form of a sample, as produced by decoders and older logs
#[derive(Deserialize)]
struct RawRgb {
    r: f64,
    g: f64,
    b: f64,
}

impl From<RawRgb> for RgbSample {
    fn from(raw: RawRgb) -> Self {
        RgbSample::from_averages(raw.r, raw.g, raw.b)
    }
}

impl RgbSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a sample from fractional channel averages
    ///
    /// Each channel is rounded to the nearest integer and clamped to [0, 255];
    /// NaN maps to 0.
    pub fn from_averages(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Channels as `[r, g, b]`
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Hexadecimal color string (e.g., "#1E90FF")
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a hexadecimal color string, with or without leading `#`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ScanError::invalid_parameter("hex", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ScanError::invalid_parameter("hex", hex))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// CIE L*a*b* color under D65
///
/// `l` is in [0, 100]; `a` and `b` are unbounded but stay within roughly
/// [-128, 127] for sRGB input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    #[serde(rename = "L")]
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl LabColor {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_averages_rounds_and_clamps() {
        let sample = RgbSample::from_averages(12.4, 12.5, 300.0);
        assert_eq!(sample, RgbSample::new(12, 13, 255));

        let sample = RgbSample::from_averages(-4.0, f64::NAN, 254.6);
        assert_eq!(sample, RgbSample::new(0, 0, 255));
    }

    #[test]
    fn test_deserialize_clamps_out_of_range() {
        let sample: RgbSample = serde_json::from_str(r#"{"r": 300, "g": -1, "b": 127.6}"#).unwrap();
        assert_eq!(sample, RgbSample::new(255, 0, 128));
    }

    #[test]
    fn test_serialize_as_integers() {
        let json = serde_json::to_string(&RgbSample::new(1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"r":1,"g":2,"b":3}"#);
    }

    #[test]
    fn test_hex_roundtrip() {
        let sample = RgbSample::new(0x1E, 0x90, 0xFF);
        assert_eq!(sample.to_hex(), "#1E90FF");
        assert_eq!(RgbSample::from_hex("#1E90FF").unwrap(), sample);
        assert_eq!(RgbSample::from_hex("1e90ff").unwrap(), sample);
    }

    #[test]
    fn test_hex_invalid() {
        assert!(RgbSample::from_hex("#FF").is_err());
        assert!(RgbSample::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_lab_uses_uppercase_lightness_key() {
        let json = serde_json::to_string(&LabColor::new(50.0, 1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"L":50.0,"a":1.5,"b":-2.0}"#);
    }
}
