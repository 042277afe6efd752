use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use etude_domain::DatasetError;

use crate::catalog::PieceCatalog;

/// Number of unique pieces in the PIG v1.2 release.
pub const EXPECTED_PIECES: usize = 150;

const FINGERING_DIR: &str = "FingeringFiles";
const CATALOG_FILE: &str = "List.csv";

/// One fingering file discovered in the archive. File names look like
/// `001-2_fingering.txt`: piece index, then fingering version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FingeringSource {
    pub path: PathBuf,
    /// 1-based index into the piece catalog.
    pub piece_index: usize,
    pub version: u8,
}

impl FingeringSource {
    fn from_path(path: PathBuf) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let (index_part, rest) = stem.split_once('-')?;
        let piece_index = index_part.parse().ok()?;
        let version = rest.chars().next()?.to_digit(10)? as u8;
        Some(Self {
            path,
            piece_index,
            version,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An opened PIG archive: the piece catalog plus every discovered
/// fingering file, sorted by file name.
pub struct PigDataset {
    root: PathBuf,
    catalog: PieceCatalog,
    sources: Vec<FingeringSource>,
}

impl PigDataset {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DatasetError::NotFound(root));
        }
        let fingering_dir = root.join(FINGERING_DIR);
        if !fingering_dir.is_dir() {
            return Err(DatasetError::NotFound(fingering_dir));
        }
        let catalog = PieceCatalog::load(&root.join(CATALOG_FILE))?;

        let mut paths: Vec<PathBuf> = fs::read_dir(&fingering_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        let mut sources = Vec::new();
        for path in paths {
            match FingeringSource::from_path(path.clone()) {
                Some(source) => sources.push(source),
                None => warn!(path = %path.display(), "ignoring file with unrecognized name"),
            }
        }
        Ok(Self {
            root,
            catalog,
            sources,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    /// Every discovered fingering file, all versions included.
    pub fn sources(&self) -> &[FingeringSource] {
        &self.sources
    }

    /// The first annotated fingering of each piece, the "single finger"
    /// subset used for training.
    pub fn single_finger_sources(&self) -> Vec<&FingeringSource> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .filter(|source| seen.insert(source.piece_index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(path: &Path, contents: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{contents}").unwrap();
    }

    fn fake_archive() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir.path().join("List.csv"),
            "Id,Piece\n1,Waltz Op.64 No.1\n2,Sarabande\n",
        );
        let fingering = dir.path().join("FingeringFiles");
        std::fs::create_dir(&fingering).unwrap();
        let row = "0\t0.0\t0.5\tC4\t80\t64\t0\t1\n";
        write_file(&fingering.join("001-1_fingering.txt"), row);
        write_file(&fingering.join("001-2_fingering.txt"), row);
        write_file(&fingering.join("002-1_fingering.txt"), row);
        write_file(&fingering.join("notes.md"), "scratch");
        dir
    }

    #[test]
    fn missing_root_is_not_found() {
        let result = PigDataset::open("no-such-dataset");
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn missing_fingering_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("List.csv"), "Id,Piece\n1,Waltz\n");
        let result = PigDataset::open(dir.path());
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn discovers_sources_in_name_order() {
        let dir = fake_archive();
        let dataset = PigDataset::open(dir.path()).unwrap();
        assert_eq!(dataset.sources().len(), 3);
        assert_eq!(dataset.sources()[0].piece_index, 1);
        assert_eq!(dataset.sources()[0].version, 1);
        assert_eq!(dataset.sources()[1].version, 2);
        assert_eq!(dataset.sources()[2].piece_index, 2);
    }

    #[test]
    fn single_finger_keeps_first_version_per_piece() {
        let dir = fake_archive();
        let dataset = PigDataset::open(dir.path()).unwrap();
        let selected = dataset.single_finger_sources();
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|source| source.version == 1));
    }
}
