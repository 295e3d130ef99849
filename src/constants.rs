//! Colorimetric constants and reference values for water-quality analysis
//!
//! This module contains compile-time constants for the sRGB → CIE L*a*b*
//! conversion, the pH estimator and the quality interpreter defaults.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. This is the standard reference for digital
/// images and phone camera output.
pub mod d65 {
    /// D65 white point in CIE XYZ color space (Xn, Yn, Zn)
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_POINT_XYZ: [f64; 3] = [0.95047, 1.00000, 1.08883];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// sRGB companding and the linear-RGB → XYZ transform
pub mod srgb {
    /// Encoded values at or below this threshold use the linear segment
    pub const GAMMA_THRESHOLD: f64 = 0.04045;

    /// Slope of the linear segment of the sRGB transfer curve
    pub const LINEAR_SLOPE: f64 = 12.92;

    /// Offset and divisor of the power segment
    pub const GAMMA_OFFSET: f64 = 0.055;
    pub const GAMMA_DIVISOR: f64 = 1.055;

    /// Exponent of the power segment
    pub const GAMMA_EXPONENT: f64 = 2.4;

    /// Linear sRGB (D65) → CIE XYZ, row-major
    pub const TO_XYZ: [[f64; 3]; 3] = [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ];
}

/// CIE L*a*b* nonlinearity
pub mod cie {
    /// Values above this use the cube root branch
    pub const EPSILON: f64 = 0.008856;

    /// Slope of the linear branch
    pub const LINEAR_SLOPE: f64 = 7.787;

    /// Offset of the linear branch (16/116)
    pub const LINEAR_OFFSET: f64 = 16.0 / 116.0;
}

/// pH estimation bounds and the uncalibrated fallback mapping
pub mod ph {
    /// Lowest reportable pH
    pub const MIN: f64 = 0.0;

    /// Highest reportable pH
    pub const MAX: f64 = 14.0;

    /// Neutral pH around which the fallback heuristic is centered
    pub const NEUTRAL: f64 = 7.0;

    /// Lightness at which the fallback heuristic returns neutral
    pub const FALLBACK_L_CENTER: f64 = 50.0;

    /// Fallback sensitivity to lightness
    pub const FALLBACK_L_COEF: f64 = 0.01;

    /// Fallback sensitivity to a* (green-red)
    pub const FALLBACK_A_COEF: f64 = -0.02;

    /// Fallback sensitivity to b* (blue-yellow)
    pub const FALLBACK_B_COEF: f64 = 0.015;

    /// Estimates are rounded to this many decimal places
    pub const DECIMALS: i32 = 2;
}

/// Quality interpreter defaults
pub mod quality {
    /// Composite weight of clarity
    pub const CLARITY_WEIGHT: f64 = 0.4;

    /// Composite weight of inverted turbidity
    pub const TURBIDITY_WEIGHT: f64 = 0.3;

    /// Composite weight of purity
    pub const PURITY_WEIGHT: f64 = 0.3;

    /// Minimum composite score for each status, best first
    pub const EXCELLENT_MIN: f64 = 85.0;
    pub const GOOD_MIN: f64 = 70.0;
    pub const FAIR_MIN: f64 = 50.0;
    pub const POOR_MIN: f64 = 30.0;

    /// Individual metric level that triggers a targeted recommendation
    pub const METRIC_CONCERN_LEVEL: f64 = 50.0;

    /// Lab chroma above which a sample counts as visibly tinted
    pub const TINT_CHROMA: f64 = 20.0;

    /// Metric percentages are clamped to this range
    pub const PERCENT_MIN: f64 = 0.0;
    pub const PERCENT_MAX: f64 = 100.0;
}

/// Time windows offered by the log viewer
pub mod windows {
    /// "Last 7 days" preset
    pub const WEEK_DAYS: u32 = 7;

    /// "Last 30 days" preset
    pub const MONTH_DAYS: u32 = 30;
}

/// Minimum labelled samples for a least-squares calibration fit (intercept + L, a, b)
pub const MIN_CALIBRATION_SAMPLES: usize = 4;
