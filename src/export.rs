//! Flat rendering of scan records for tabular export
//!
//! The CSV writer lives outside this crate; it only needs a stable column
//! order and one string per cell. Absent values render as empty cells.

use crate::quality::WaterStatus;
use crate::store::ScanRecord;

/// One scan record flattened to export columns
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: String,
    pub lab_l: Option<f64>,
    pub lab_a: Option<f64>,
    pub lab_b: Option<f64>,
    pub ph: Option<f64>,
    pub status: WaterStatus,
    pub safe_for_drinking: bool,
    pub image_ref: Option<String>,
    pub notes: Option<String>,
}

impl ExportRow {
    /// Column names, in the order of [`ExportRow::fields`]
    pub const HEADERS: [&'static str; 14] = [
        "id",
        "timestamp",
        "r",
        "g",
        "b",
        "hex",
        "L*",
        "a*",
        "b*",
        "ph",
        "status",
        "safeForDrinking",
        "imageRef",
        "notes",
    ];

    /// Cell values, in the order of [`ExportRow::HEADERS`]
    pub fn fields(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        vec![
            self.id.clone(),
            self.timestamp.clone(),
            self.r.to_string(),
            self.g.to_string(),
            self.b.to_string(),
            self.hex.clone(),
            opt(&self.lab_l),
            opt(&self.lab_a),
            opt(&self.lab_b),
            opt(&self.ph),
            self.status.label().to_lowercase(),
            self.safe_for_drinking.to_string(),
            opt(&self.image_ref),
            opt(&self.notes),
        ]
    }
}

impl From<&ScanRecord> for ExportRow {
    fn from(record: &ScanRecord) -> Self {
        Self {
            id: record.id.clone(),
            timestamp: record.timestamp.to_rfc3339(),
            r: record.color_data.r,
            g: record.color_data.g,
            b: record.color_data.b,
            hex: record.color_data.to_hex(),
            lab_l: record.lab.map(|lab| lab.l),
            lab_a: record.lab.map(|lab| lab.a),
            lab_b: record.lab.map(|lab| lab.b),
            ph: record.ph,
            status: record.interpretation.status,
            safe_for_drinking: record.interpretation.safe_for_drinking,
            image_ref: record.image_ref.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Flatten records, keeping their order
pub fn export_rows(records: &[ScanRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}
