use std::path::Path;

use etude_domain::DatasetError;

/// Piece names from the archive's `List.csv`, in row order. Fingering
/// file names carry a 1-based index into this list.
#[derive(Clone, Debug, Default)]
pub struct PieceCatalog {
    pieces: Vec<String>,
}

impl PieceCatalog {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::not_found(path));
        }
        let mut reader =
            csv::Reader::from_path(path).map_err(|err| DatasetError::format(err.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|err| DatasetError::format(err.to_string()))?;
        let piece_column = headers
            .iter()
            .position(|header| header == "Piece")
            .ok_or_else(|| DatasetError::format("List.csv has no Piece column"))?;

        let mut pieces = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| DatasetError::format(err.to_string()))?;
            let piece = record
                .get(piece_column)
                .ok_or_else(|| DatasetError::format("List.csv row missing Piece value"))?;
            pieces.push(piece.to_string());
        }
        Ok(Self { pieces })
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Looks up a piece by the 1-based index encoded in file names.
    pub fn piece_name(&self, index: usize) -> Option<&str> {
        self.pieces.get(index.checked_sub(1)?).map(String::as_str)
    }

    /// Piece name normalized for output file stems.
    pub fn normalized_name(&self, index: usize) -> Option<String> {
        self.piece_name(index).map(normalize_piece_name)
    }
}

fn normalize_piece_name(name: &str) -> String {
    name.replace(' ', "_")
        .replace('-', "_")
        .replace('.', "")
        .replace(',', "")
        .to_lowercase()
}
