//! Scan record types
//!
//! The persisted JSON uses camelCase keys (`colorData`, `qualityMetrics`,
//! `imageRef`, ...). Optional fields are omitted when absent and read back
//! as `None` when missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::{LabColor, RgbSample};
use crate::constants::windows;
use crate::quality::{Interpretation, QualityMetrics};
use crate::{Result, ScanError};

/// Where a scan was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One persisted observation
///
/// Created by [`ScanLogStore::add_scan`](crate::store::ScanLogStore::add_scan)
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub color_data: RgbSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<LabColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    pub quality_metrics: QualityMetrics,
    pub interpretation: Interpretation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Opaque reference to the captured image (URI, path, upload key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

/// Everything a scan record holds except its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ScanDraft {
    pub timestamp: DateTime<Utc>,
    pub color_data: RgbSample,
    pub lab: Option<LabColor>,
    pub ph: Option<f64>,
    pub quality_metrics: QualityMetrics,
    pub interpretation: Interpretation,
    pub notes: Option<String>,
    pub image_ref: Option<String>,
    pub location: Option<GeoLocation>,
}

impl ScanDraft {
    pub fn new(
        timestamp: DateTime<Utc>,
        color_data: RgbSample,
        quality_metrics: QualityMetrics,
        interpretation: Interpretation,
    ) -> Self {
        Self {
            timestamp,
            color_data,
            lab: None,
            ph: None,
            quality_metrics,
            interpretation,
            notes: None,
            image_ref: None,
            location: None,
        }
    }

    pub fn with_lab(mut self, lab: LabColor) -> Self {
        self.lab = Some(lab);
        self
    }

    pub fn with_ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }

    /// Blank notes are treated as no notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Reject values JSON cannot carry
    ///
    /// NaN and infinities serialize as `null`, which would make the whole
    /// persisted log unreadable.
    pub fn validate(&self) -> Result<()> {
        let mut fields = Vec::new();
        if let Some(lab) = self.lab {
            fields.extend([("lab.L", lab.l), ("lab.a", lab.a), ("lab.b", lab.b)]);
        }
        if let Some(ph) = self.ph {
            fields.push(("ph", ph));
        }
        if let Some(location) = self.location {
            fields.extend([
                ("location.latitude", location.latitude),
                ("location.longitude", location.longitude),
            ]);
        }

        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(ScanError::invalid_parameter(name, value)),
            None => Ok(()),
        }
    }

    pub(crate) fn into_record(self, id: String) -> ScanRecord {
        ScanRecord {
            id,
            timestamp: self.timestamp,
            color_data: self.color_data,
            lab: self.lab,
            ph: self.ph,
            quality_metrics: self.quality_metrics,
            interpretation: self.interpretation,
            notes: self.notes,
            image_ref: self.image_ref,
            location: self.location,
        }
    }
}

/// Aggregates over a set of scan records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    pub total_scans: usize,
    /// Records whose interpretation says safe for drinking
    pub safe_count: usize,
    /// Mean clarity over the given records, in [0, 100]
    pub average_clarity: f64,
}

/// Time window presets offered by the log viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Last7Days,
    Last30Days,
    LastDays(u32),
}

impl LogFilter {
    /// Window length in days, `None` for no window
    pub fn days(self) -> Option<u32> {
        match self {
            LogFilter::All => None,
            LogFilter::Last7Days => Some(windows::WEEK_DAYS),
            LogFilter::Last30Days => Some(windows::MONTH_DAYS),
            LogFilter::LastDays(days) => Some(days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::WaterStatus;
    use chrono::TimeZone;

    fn interpretation() -> Interpretation {
        Interpretation {
            status: WaterStatus::Good,
            summary: "Good water quality".to_string(),
            safe_for_drinking: true,
            recommendations: vec!["Re-test periodically.".to_string()],
        }
    }

    fn draft() -> ScanDraft {
        ScanDraft::new(
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            RgbSample::new(120, 140, 160),
            QualityMetrics::new(75.0, 65.0, 80.0),
            interpretation(),
        )
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        assert_eq!(draft().with_notes("   ").notes, None);
        assert_eq!(draft().with_notes("river inlet").notes.as_deref(), Some("river inlet"));
    }

    #[test]
    fn test_persisted_keys_are_camel_case() {
        let record = draft()
            .with_image_ref("file:///scans/1.jpg")
            .with_location(GeoLocation::new(37.7749, -122.4194))
            .into_record("1".to_string());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("colorData").is_some());
        assert!(json.get("qualityMetrics").is_some());
        assert_eq!(json["interpretation"]["safeForDrinking"], true);
        assert_eq!(json["imageRef"], "file:///scans/1.jpg");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_missing_optional_fields_read_as_none() {
        let json = r#"{
            "id": "1700000000000",
            "timestamp": "2026-03-14T09:30:00Z",
            "colorData": {"r": 10, "g": 20, "b": 30},
            "qualityMetrics": {"clarity": 75, "turbidity": 65, "purity": 80},
            "interpretation": {
                "status": "fair",
                "summary": "Fair",
                "safeForDrinking": false,
                "recommendations": ["Boil first."]
            }
        }"#;
        let record: ScanRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.notes, None);
        assert_eq!(record.location, None);
        assert_eq!(record.lab, None);
        assert_eq!(record.interpretation.status, WaterStatus::Fair);
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        assert!(draft().validate().is_ok());
        assert!(draft().with_ph(f64::NAN).validate().is_err());
        assert!(draft()
            .with_lab(LabColor::new(50.0, f64::INFINITY, 0.0))
            .validate()
            .is_err());

        let err = draft()
            .with_location(GeoLocation::new(f64::NAN, 10.0))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: location.latitude = NaN");
    }

    #[test]
    fn test_filter_presets() {
        assert_eq!(LogFilter::All.days(), None);
        assert_eq!(LogFilter::Last7Days.days(), Some(7));
        assert_eq!(LogFilter::Last30Days.days(), Some(30));
        assert_eq!(LogFilter::LastDays(90).days(), Some(90));
    }
}
