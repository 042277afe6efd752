use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use etude_domain::ExportFormat;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessReport {
    pub ready: bool,
    pub piece_count: usize,
    pub save_dir: PathBuf,
}

/// Cheap existence check used by downstream training code: counts
/// normalized files in the destination without touching the source
/// archive. Ready when at least one piece exists, or at least
/// `expected_pieces` when given.
pub fn check_dataset(
    save_dir: &Path,
    format: ExportFormat,
    expected_pieces: Option<usize>,
) -> ReadinessReport {
    let mut piece_count = 0;
    if let Ok(entries) = fs::read_dir(save_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(format.extension()) {
                piece_count += 1;
            }
        }
    }
    let ready = match expected_pieces {
        Some(expected) => piece_count >= expected,
        None => piece_count > 0,
    };
    ReadinessReport {
        ready,
        piece_count,
        save_dir: save_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn missing_directory_is_not_ready() {
        let report = check_dataset(Path::new("no-such-dir"), ExportFormat::Json, None);
        assert!(!report.ready);
        assert_eq!(report.piece_count, 0);
    }

    #[test]
    fn empty_directory_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let report = check_dataset(dir.path(), ExportFormat::Json, None);
        assert!(!report.ready);
    }

    #[test]
    fn counts_only_matching_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a-1.json", "b-1.json", "notes.txt"] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            write!(file, "{{}}").unwrap();
        }
        let report = check_dataset(dir.path(), ExportFormat::Json, None);
        assert!(report.ready);
        assert_eq!(report.piece_count, 2);
    }

    #[test]
    fn expected_count_gates_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("a-1.json")).unwrap();
        write!(file, "{{}}").unwrap();
        assert!(!check_dataset(dir.path(), ExportFormat::Json, Some(2)).ready);
        assert!(check_dataset(dir.path(), ExportFormat::Json, Some(1)).ready);
    }
}
