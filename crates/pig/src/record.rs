use std::fs;
use std::path::Path;

use etude_domain::{DatasetError, Finger, Hand};

/// One row of a PIG fingering file, as written in the source archive.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAnnotationRecord {
    pub note_id: u32,
    pub onset_time: f64,
    pub offset_time: f64,
    /// Spelled pitch, e.g. `C#4`.
    pub pitch: String,
    pub onset_velocity: u8,
    pub offset_velocity: u8,
    /// 0 = right hand, 1 = left hand.
    pub channel: u8,
    /// Raw finger label: `1`-`5` right hand, `-1`-`-5` left hand,
    /// substitutions written as e.g. `3_1`.
    pub finger_label: String,
}

impl RawAnnotationRecord {
    pub fn from_line(line: &str) -> Result<Self, DatasetError> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 8 {
            return Err(DatasetError::format(format!(
                "expected 8 tab-separated fields, got {}",
                parts.len()
            )));
        }
        Ok(Self {
            note_id: parse_field(parts[0], "note id")?,
            onset_time: parse_field(parts[1], "onset time")?,
            offset_time: parse_field(parts[2], "offset time")?,
            pitch: parts[3].to_string(),
            onset_velocity: parse_field(parts[4], "onset velocity")?,
            offset_velocity: parse_field(parts[5], "offset velocity")?,
            channel: parse_field(parts[6], "channel")?,
            finger_label: parts[7].trim().to_string(),
        })
    }

    /// Resolves the raw label to a finger. Substitutions keep the
    /// starting finger; negative values are the left hand.
    pub fn finger(&self) -> Result<Finger, DatasetError> {
        let label = self.finger_label.split('_').next().unwrap_or_default();
        let value: i8 = label.parse().map_err(|_| {
            DatasetError::validation(format!("bad finger label '{}'", self.finger_label))
        })?;
        if value > 0 {
            Finger::new(Hand::Right, value as u8)
        } else if value < 0 {
            Finger::new(Hand::Left, value.unsigned_abs())
        } else {
            Err(DatasetError::validation("finger label 0 is not assignable"))
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, DatasetError> {
    raw.trim()
        .parse()
        .map_err(|_| DatasetError::format(format!("bad {what} '{raw}'")))
}

/// A row that failed to parse, reported rather than silently dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct RowIssue {
    pub line_number: usize,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedFile {
    pub records: Vec<RawAnnotationRecord>,
    pub issues: Vec<RowIssue>,
}

/// Reads a fingering file, skipping `//` header comments and blank
/// lines. Rows that fail to parse land in `issues`.
pub fn parse_fingering_file(path: &Path) -> Result<ParsedFile, DatasetError> {
    let contents = fs::read_to_string(path)?;
    let mut parsed = ParsedFile::default();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        match RawAnnotationRecord::from_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(err) => parsed.issues.push(RowIssue {
                line_number: index + 1,
                message: err.to_string(),
            }),
        }
    }
    Ok(parsed)
}
