use serde::{Deserialize, Serialize};

use crate::{error::DatasetError, fingering::Hand, piece::PieceFingering};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

pub trait FingeringExporter {
    fn export(&self, piece: &PieceFingering, format: ExportFormat)
        -> Result<Vec<u8>, DatasetError>;
}

/// The normalized on-disk format consumed by training code.
pub struct JsonExporter;

impl FingeringExporter for JsonExporter {
    fn export(
        &self,
        piece: &PieceFingering,
        format: ExportFormat,
    ) -> Result<Vec<u8>, DatasetError> {
        match format {
            ExportFormat::Json => serde_json::to_vec_pretty(piece)
                .map_err(|err| DatasetError::format(err.to_string())),
            other => Err(DatasetError::validation(format!(
                "JsonExporter cannot handle {:?}",
                other
            ))),
        }
    }
}

/// One row per note, for spreadsheet inspection of a piece.
pub struct CsvExporter;

impl FingeringExporter for CsvExporter {
    fn export(
        &self,
        piece: &PieceFingering,
        format: ExportFormat,
    ) -> Result<Vec<u8>, DatasetError> {
        if format != ExportFormat::Csv {
            return Err(DatasetError::validation(format!(
                "CsvExporter cannot handle {:?}",
                format
            )));
        }
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["onset", "offset", "pitch", "velocity", "hand", "finger"])
            .map_err(|err| DatasetError::format(err.to_string()))?;
        for note in &piece.notes {
            let hand = match note.finger.hand() {
                Hand::Right => "right",
                Hand::Left => "left",
            };
            writer
                .write_record([
                    note.onset.to_string(),
                    note.offset.to_string(),
                    note.pitch.to_string(),
                    note.velocity.to_string(),
                    hand.to_string(),
                    note.finger.digit().to_string(),
                ])
                .map_err(|err| DatasetError::format(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| DatasetError::format(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingering::{Finger, FingeredNote};

    fn sample_piece() -> PieceFingering {
        PieceFingering::new(
            "test_piece",
            1,
            vec![
                FingeredNote::new(0.0, 0.5, 60, 80, Finger::new(Hand::Right, 1).unwrap()).unwrap(),
                FingeredNote::new(0.5, 1.0, 48, 72, Finger::new(Hand::Left, 2).unwrap()).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn exports_json() {
        let bytes = JsonExporter.export(&sample_piece(), ExportFormat::Json).unwrap();
        let output = String::from_utf8(bytes).unwrap();
        assert!(output.contains("\"piece\": \"test_piece\""));
        assert!(output.contains("\"title\": \"Test Piece\""));
    }

    #[test]
    fn json_exporter_rejects_csv() {
        assert!(JsonExporter.export(&sample_piece(), ExportFormat::Csv).is_err());
    }

    #[test]
    fn exports_csv() {
        let bytes = CsvExporter.export(&sample_piece(), ExportFormat::Csv).unwrap();
        let output = String::from_utf8(bytes).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "onset,offset,pitch,velocity,hand,finger"
        );
        assert_eq!(lines.next().unwrap(), "0,0.5,60,80,right,1");
        assert_eq!(lines.next().unwrap(), "0.5,1,48,72,left,2");
    }

    #[test]
    fn csv_exporter_rejects_json() {
        assert!(CsvExporter.export(&sample_piece(), ExportFormat::Json).is_err());
    }
}
