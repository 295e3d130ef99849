//! Color space conversion utilities
//!
//! Converts averaged sRGB samples to CIE L*a*b* (D65) with the classic
//! formulation: inverse sRGB companding, the sRGB → XYZ matrix, white point
//! normalization and the CIE cube-root nonlinearity with its linear toe.
//! The arithmetic is done in `f64` with the constants from
//! [`crate::constants`] so results are reproducible across platforms.

use palette::{FromColor, Lab, Lch};

use crate::color::{LabColor, RgbSample};
use crate::constants::{cie, srgb, D65_WHITE_POINT_XYZ};

/// Stateless sRGB → L*a*b* converter
///
/// Safe to share between threads; every method is a pure function of its
/// arguments and the white point fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ColorConverter {
    white_point: [f64; 3],
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter with D65 as reference white
    pub fn new() -> Self {
        Self {
            white_point: D65_WHITE_POINT_XYZ,
        }
    }

    /// Convert an 8-bit sample to Lab
    pub fn rgb_to_lab(&self, sample: RgbSample) -> LabColor {
        self.normalized_to_lab(
            f64::from(sample.r) / 255.0,
            f64::from(sample.g) / 255.0,
            f64::from(sample.b) / 255.0,
        )
    }

    /// Convert fractional channel averages (nominally 0-255) to Lab
    ///
    /// Used for calibration images whose averages are not rounded. Values
    /// are clamped to [0, 255] first, matching [`RgbSample::from_averages`].
    pub fn averages_to_lab(&self, r: f64, g: f64, b: f64) -> LabColor {
        let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 255.0) / 255.0 };
        self.normalized_to_lab(unit(r), unit(g), unit(b))
    }

    fn normalized_to_lab(&self, r: f64, g: f64, b: f64) -> LabColor {
        let linear = [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)];

        let mut xyz = [0.0; 3];
        for (out, row) in xyz.iter_mut().zip(srgb::TO_XYZ.iter()) {
            *out = row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2];
        }

        let fx = lab_f(xyz[0] / self.white_point[0]);
        let fy = lab_f(xyz[1] / self.white_point[1]);
        let fz = lab_f(xyz[2] / self.white_point[2]);

        LabColor {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Convert to palette's Lab type for further color math
    pub fn to_palette(&self, lab: LabColor) -> Lab {
        Lab::new(lab.l as f32, lab.a as f32, lab.b as f32)
    }

    /// Chroma (colorfulness) of a Lab color, from its LCh form
    pub fn chroma(&self, lab: LabColor) -> f64 {
        let lch: Lch = Lch::from_color(self.to_palette(lab));
        f64::from(lch.chroma)
    }

    /// Hue angle of a Lab color in degrees, [0, 360)
    pub fn hue_degrees(&self, lab: LabColor) -> f64 {
        let lch: Lch = Lch::from_color(self.to_palette(lab));
        f64::from(lch.hue.into_positive_degrees())
    }
}

/// Convert one 8-bit sRGB triple to CIE L*a*b* (D65)
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> LabColor {
    ColorConverter::new().rgb_to_lab(RgbSample::new(r, g, b))
}

/// Inverse sRGB companding for a channel in [0, 1]
fn srgb_to_linear(v: f64) -> f64 {
    if v <= srgb::GAMMA_THRESHOLD {
        v / srgb::LINEAR_SLOPE
    } else {
        ((v + srgb::GAMMA_OFFSET) / srgb::GAMMA_DIVISOR).powf(srgb::GAMMA_EXPONENT)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > cie::EPSILON {
        t.cbrt()
    } else {
        cie::LINEAR_SLOPE * t + cie::LINEAR_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use palette::Srgb;

    #[test]
    fn test_rgb_to_lab_black() {
        let lab = rgb_to_lab(0, 0, 0);
        assert_abs_diff_eq!(lab.l, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lab.a, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lab.b, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let lab = rgb_to_lab(255, 255, 255);
        assert_abs_diff_eq!(lab.l, 100.0, epsilon = 0.01);
        assert!(lab.a.abs() < 0.01);
        assert!(lab.b.abs() < 0.01);
    }

    #[test]
    fn test_rgb_to_lab_primary_red() {
        // Reference values for sRGB red under D65
        let lab = rgb_to_lab(255, 0, 0);
        assert_abs_diff_eq!(lab.l, 53.24, epsilon = 0.05);
        assert_abs_diff_eq!(lab.a, 80.09, epsilon = 0.05);
        assert_abs_diff_eq!(lab.b, 67.20, epsilon = 0.05);
    }

    #[test]
    fn test_dark_channels_use_linear_segment() {
        // 10/255 is below the companding threshold
        let v = 10.0 / 255.0;
        assert_abs_diff_eq!(srgb_to_linear(v), v / 12.92, epsilon = 1e-15);
    }

    #[test]
    fn test_gray_is_neutral() {
        for level in [32u8, 96, 128, 200] {
            let lab = rgb_to_lab(level, level, level);
            assert!(lab.a.abs() < 0.01, "a* not neutral for {}", level);
            assert!(lab.b.abs() < 0.01, "b* not neutral for {}", level);
        }
    }

    #[test]
    fn test_agrees_with_palette() {
        let converter = ColorConverter::new();
        for (r, g, b) in [(30u8, 144u8, 255u8), (120, 80, 40), (250, 240, 190)] {
            let ours = converter.rgb_to_lab(RgbSample::new(r, g, b));
            let reference: Lab = Lab::from_color(Srgb::new(r, g, b).into_format::<f32>());
            assert_abs_diff_eq!(ours.l, f64::from(reference.l), epsilon = 0.5);
            assert_abs_diff_eq!(ours.a, f64::from(reference.a), epsilon = 0.5);
            assert_abs_diff_eq!(ours.b, f64::from(reference.b), epsilon = 0.5);
        }
    }

    #[test]
    fn test_averages_match_integer_path() {
        let converter = ColorConverter::new();
        let from_u8 = converter.rgb_to_lab(RgbSample::new(40, 90, 160));
        let from_f64 = converter.averages_to_lab(40.0, 90.0, 160.0);
        assert_eq!(from_u8, from_f64);
    }

    #[test]
    fn test_chroma_and_hue() {
        let converter = ColorConverter::new();
        let lab = LabColor::new(50.0, 25.0, 25.0);
        let expected_chroma = (25.0_f64 * 25.0 + 25.0 * 25.0).sqrt();
        assert_abs_diff_eq!(converter.chroma(lab), expected_chroma, epsilon = 1e-3);
        assert_abs_diff_eq!(converter.hue_degrees(lab), 45.0, epsilon = 1e-3);
    }
}
