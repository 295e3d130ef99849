//! Water-quality interpretation
//!
//! Classifies a sample into one of five statuses from a composite score of
//! its quality metrics, and derives a summary, the drinking-safety flag and
//! recommendations.
//!
//! The status depends on the metrics only: better clarity or purity, or
//! lower turbidity, never yields a worse status. The RGB sample can add a
//! discoloration recommendation but never changes the verdict.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ColorConverter, RgbSample};
use crate::config::InterpretationConfig;
use crate::constants::quality::{METRIC_CONCERN_LEVEL, TINT_CHROMA};
use crate::quality::QualityMetrics;
use crate::Result;

/// Discrete water-quality verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Unsafe,
}

impl WaterStatus {
    /// All statuses, best first
    pub const ALL: [WaterStatus; 5] = [
        WaterStatus::Excellent,
        WaterStatus::Good,
        WaterStatus::Fair,
        WaterStatus::Poor,
        WaterStatus::Unsafe,
    ];

    /// Numeric quality rank: Excellent = 4 down to Unsafe = 0
    pub fn rank(self) -> u8 {
        match self {
            WaterStatus::Excellent => 4,
            WaterStatus::Good => 3,
            WaterStatus::Fair => 2,
            WaterStatus::Poor => 1,
            WaterStatus::Unsafe => 0,
        }
    }

    /// Only Excellent and Good water is considered drinkable
    pub fn is_safe(self) -> bool {
        matches!(self, WaterStatus::Excellent | WaterStatus::Good)
    }

    pub fn label(self) -> &'static str {
        match self {
            WaterStatus::Excellent => "Excellent",
            WaterStatus::Good => "Good",
            WaterStatus::Fair => "Fair",
            WaterStatus::Poor => "Poor",
            WaterStatus::Unsafe => "Unsafe",
        }
    }
}

impl Ord for WaterStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for WaterStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WaterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict with explanation and guidance
///
/// On deserialization `safe_for_drinking` is recomputed from `status`; a
/// stored flag that disagrees is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawInterpretation")]
pub struct Interpretation {
    pub status: WaterStatus,
    pub summary: String,
    /// Always equal to `status.is_safe()`
    pub safe_for_drinking: bool,
    /// Empty only for Excellent
    pub recommendations: Vec<String>,
}

#[derive(Deserialize)]
struct RawInterpretation {
    status: WaterStatus,
    summary: String,
    recommendations: Vec<String>,
}

impl From<RawInterpretation> for Interpretation {
    fn from(raw: RawInterpretation) -> Self {
        Interpretation {
            status: raw.status,
            summary: raw.summary,
            safe_for_drinking: raw.status.is_safe(),
            recommendations: raw.recommendations,
        }
    }
}

/// Which metric held the composite score down the most
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weakest {
    Clarity,
    Turbidity,
    Purity,
}

/// Metric-driven water-quality classifier
#[derive(Debug, Clone, Default)]
pub struct QualityInterpreter {
    config: InterpretationConfig,
    converter: ColorConverter,
}

impl QualityInterpreter {
    /// Create an interpreter, rejecting configurations that break status ordering
    pub fn new(config: InterpretationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            converter: ColorConverter::new(),
        })
    }

    pub fn config(&self) -> &InterpretationConfig {
        &self.config
    }

    /// Weighted mean of clarity, inverted turbidity and purity, in [0, 100]
    pub fn composite_score(&self, metrics: &QualityMetrics) -> f64 {
        let w = &self.config.weights;
        (w.clarity * metrics.clarity + w.turbidity * metrics.water_clearness() + w.purity * metrics.purity)
            / w.total()
    }

    /// Status for a composite score
    pub fn status_for_score(&self, score: f64) -> WaterStatus {
        let b = &self.config.breakpoints;
        if score >= b.excellent {
            WaterStatus::Excellent
        } else if score >= b.good {
            WaterStatus::Good
        } else if score >= b.fair {
            WaterStatus::Fair
        } else if score >= b.poor {
            WaterStatus::Poor
        } else {
            WaterStatus::Unsafe
        }
    }

    /// Classify a sample
    pub fn interpret(&self, rgb: RgbSample, metrics: &QualityMetrics) -> Interpretation {
        let score = self.composite_score(metrics);
        let status = self.status_for_score(score);
        let weakest = weakest_metric(metrics);

        let summary = match status {
            WaterStatus::Excellent => format!(
                "Excellent water quality (score {:.1}); all measured indicators are strong.",
                score
            ),
            _ => format!(
                "{} water quality (score {:.1}), limited mainly by {}.",
                status.label(),
                score,
                describe_weakest(weakest, metrics)
            ),
        };

        let mut recommendations = Vec::new();
        if status != WaterStatus::Excellent {
            recommendations.extend(status_guidance(status).iter().map(|s| s.to_string()));
            recommendations.extend(metric_guidance(metrics));

            let lab = self.converter.rgb_to_lab(rgb);
            if self.converter.chroma(lab) > TINT_CHROMA {
                recommendations.push(format!(
                    "The sample has a visible {} tint; discoloration can indicate dissolved metals or organic matter.",
                    hue_name(self.converter.hue_degrees(lab))
                ));
            }
        }

        tracing::debug!(
            "Interpreted sample {} as {} (score {:.1}, {} recommendations)",
            rgb.to_hex(),
            status,
            score,
            recommendations.len()
        );

        Interpretation {
            status,
            summary,
            safe_for_drinking: status.is_safe(),
            recommendations,
        }
    }
}

fn weakest_metric(metrics: &QualityMetrics) -> Weakest {
    let candidates = [
        (Weakest::Clarity, metrics.clarity),
        (Weakest::Turbidity, metrics.water_clearness()),
        (Weakest::Purity, metrics.purity),
    ];
    candidates
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(which, _)| *which)
        .unwrap_or(Weakest::Clarity)
}

fn describe_weakest(weakest: Weakest, metrics: &QualityMetrics) -> String {
    match weakest {
        Weakest::Clarity => format!("clarity ({:.1}%)", metrics.clarity),
        Weakest::Turbidity => format!("turbidity ({:.1}%)", metrics.turbidity),
        Weakest::Purity => format!("purity ({:.1}%)", metrics.purity),
    }
}

fn status_guidance(status: WaterStatus) -> &'static [&'static str] {
    match status {
        WaterStatus::Excellent => &[],
        WaterStatus::Good => &["Suitable for drinking; re-test periodically to confirm quality."],
        WaterStatus::Fair => &["Boil or filter the water before drinking."],
        WaterStatus::Poor => &[
            "Do not drink without treatment: filter, then boil for at least one minute or disinfect.",
        ],
        WaterStatus::Unsafe => &[
            "Do not drink this water; use an alternative source.",
            "Have the water tested by a certified laboratory.",
        ],
    }
}

fn metric_guidance(metrics: &QualityMetrics) -> Vec<String> {
    let mut out = Vec::new();
    if metrics.clarity < METRIC_CONCERN_LEVEL {
        out.push("Let sediment settle and decant, or pass the water through a cloth or sand filter.".to_string());
    }
    if metrics.turbidity > METRIC_CONCERN_LEVEL {
        out.push("High turbidity shields microbes from disinfection; filter before boiling or chlorinating.".to_string());
    }
    if metrics.purity < METRIC_CONCERN_LEVEL {
        out.push(
            "Low purity suggests dissolved contaminants; consider activated-carbon or reverse-osmosis treatment."
                .to_string(),
        );
    }
    out
}

fn hue_name(degrees: f64) -> &'static str {
    match degrees {
        d if d < 60.0 => "red-brown",
        d if d < 110.0 => "yellow",
        d if d < 200.0 => "green",
        d if d < 290.0 => "blue",
        d if d < 340.0 => "purple",
        _ => "red-brown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_SAMPLE: RgbSample = RgbSample::new(235, 240, 245);

    fn interpret(clarity: f64, turbidity: f64, purity: f64) -> Interpretation {
        QualityInterpreter::default().interpret(CLEAR_SAMPLE, &QualityMetrics::new(clarity, turbidity, purity))
    }

    #[test]
    fn test_status_ordering() {
        assert!(WaterStatus::Excellent > WaterStatus::Good);
        assert!(WaterStatus::Poor > WaterStatus::Unsafe);
        let mut sorted = WaterStatus::ALL;
        sorted.sort();
        assert_eq!(sorted[0], WaterStatus::Unsafe);
        assert_eq!(sorted[4], WaterStatus::Excellent);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WaterStatus::Unsafe).unwrap(), "\"unsafe\"");
        let status: WaterStatus = serde_json::from_str("\"good\"").unwrap();
        assert_eq!(status, WaterStatus::Good);
    }

    #[test]
    fn test_stored_safety_flag_follows_status() {
        let json = r#"{
            "status": "unsafe",
            "summary": "Unsafe water quality",
            "safeForDrinking": true,
            "recommendations": ["Do not drink this water."]
        }"#;
        let interpretation: Interpretation = serde_json::from_str(json).unwrap();
        assert_eq!(interpretation.status, WaterStatus::Unsafe);
        assert!(!interpretation.safe_for_drinking);

        let written = serde_json::to_value(&interpretation).unwrap();
        assert_eq!(written["safeForDrinking"], false);
    }

    #[test]
    fn test_excellent_has_no_recommendations() {
        let result = interpret(95.0, 5.0, 95.0);
        assert_eq!(result.status, WaterStatus::Excellent);
        assert!(result.safe_for_drinking);
        assert!(result.recommendations.is_empty());
        assert!(result.summary.starts_with("Excellent"));
    }

    #[test]
    fn test_default_breakpoints() {
        // composite = 0.4c + 0.3(100 - t) + 0.3p
        assert_eq!(interpret(75.0, 35.0, 80.0).status, WaterStatus::Good); // 73.5
        assert_eq!(interpret(60.0, 50.0, 50.0).status, WaterStatus::Fair); // 54
        assert_eq!(interpret(40.0, 70.0, 40.0).status, WaterStatus::Poor); // 37
        assert_eq!(interpret(10.0, 90.0, 20.0).status, WaterStatus::Unsafe); // 13
    }

    #[test]
    fn test_original_placeholder_metrics() {
        // 0.4*75 + 0.3*35 + 0.3*80 = 64.5
        let result = interpret(75.0, 65.0, 80.0);
        assert_eq!(result.status, WaterStatus::Fair);
        assert!(!result.safe_for_drinking);
        assert!(result.summary.contains("turbidity (65.0%)"));
        assert!(result.recommendations.iter().any(|r| r.contains("High turbidity")));
    }

    #[test]
    fn test_safety_matches_status_everywhere() {
        for clarity in (0..=100).step_by(10) {
            for turbidity in (0..=100).step_by(10) {
                for purity in (0..=100).step_by(10) {
                    let result = interpret(clarity as f64, turbidity as f64, purity as f64);
                    assert_eq!(result.safe_for_drinking, result.status.is_safe());
                    if result.status != WaterStatus::Excellent {
                        assert!(!result.recommendations.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_each_metric() {
        let interpreter = QualityInterpreter::default();
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 * 5.0).collect();
        for &base in &steps {
            for pair in steps.windows(2) {
                let (lo, hi) = (pair[0], pair[1]);
                let worse = interpreter.interpret(CLEAR_SAMPLE, &QualityMetrics::new(lo, base, base));
                let better = interpreter.interpret(CLEAR_SAMPLE, &QualityMetrics::new(hi, base, base));
                assert!(better.status >= worse.status);

                let worse = interpreter.interpret(CLEAR_SAMPLE, &QualityMetrics::new(base, hi, base));
                let better = interpreter.interpret(CLEAR_SAMPLE, &QualityMetrics::new(base, lo, base));
                assert!(better.status >= worse.status);
            }
        }
    }

    #[test]
    fn test_tint_adds_recommendation_without_changing_status() {
        let interpreter = QualityInterpreter::default();
        let metrics = QualityMetrics::new(60.0, 50.0, 50.0);
        let clear = interpreter.interpret(CLEAR_SAMPLE, &metrics);
        let brown = interpreter.interpret(RgbSample::new(150, 60, 40), &metrics);

        assert_eq!(clear.status, brown.status);
        assert!(!clear.recommendations.iter().any(|r| r.contains("tint")));
        assert!(brown.recommendations.iter().any(|r| r.contains("red-brown tint")));
    }

    #[test]
    fn test_custom_breakpoints() {
        let mut config = InterpretationConfig::default();
        config.breakpoints.excellent = 95.0;
        let interpreter = QualityInterpreter::new(config).unwrap();
        let result = interpreter.interpret(CLEAR_SAMPLE, &QualityMetrics::new(90.0, 10.0, 90.0));
        assert_eq!(result.status, WaterStatus::Good);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = InterpretationConfig::default();
        config.breakpoints.poor = 60.0;
        assert!(QualityInterpreter::new(config).is_err());
    }
}
