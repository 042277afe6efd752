use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::fingering::FingeredNote;

/// The normalized fingering for one piece, as written to disk.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PieceFingering {
    pub piece: String,
    /// Fingering version for pieces annotated more than once.
    pub version: u8,
    pub title: String,
    /// Offset of the last-sounding note, in seconds.
    pub total_time: f64,
    pub notes: Vec<FingeredNote>,
}

impl PieceFingering {
    /// Builds the normalized model. Notes are sorted by onset time and
    /// then pitch so reruns serialize identically.
    pub fn new(
        piece: impl Into<String>,
        version: u8,
        mut notes: Vec<FingeredNote>,
    ) -> Result<Self, DatasetError> {
        if notes.is_empty() {
            return Err(DatasetError::validation("piece has no notes"));
        }
        notes.sort_by(|a, b| {
            a.onset
                .partial_cmp(&b.onset)
                .unwrap()
                .then(a.pitch.cmp(&b.pitch))
        });
        let total_time = notes.iter().map(|note| note.offset).fold(0.0, f64::max);
        let piece = piece.into();
        let title = title_case(&piece);
        Ok(Self {
            piece,
            version,
            title,
            total_time,
            notes,
        })
    }

    /// Output file stem, e.g. `waltz_op_64_no_1-1`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.piece, self.version)
    }
}

fn title_case(piece: &str) -> String {
    piece
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
