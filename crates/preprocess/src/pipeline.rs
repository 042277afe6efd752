use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use etude_domain::{
    note_name_to_midi_number, CsvExporter, DatasetError, ExportFormat, FingeredNote,
    FingeringExporter, JsonExporter, PieceFingering,
};
use etude_pig::{
    parse_fingering_file, FingeringSource, PigDataset, RawAnnotationRecord, EXPECTED_PIECES,
};

use crate::report::{RunSummary, SkipReason, SkippedPiece};

#[derive(Clone, Debug)]
pub struct PreprocessConfig {
    pub dataset_dir: PathBuf,
    pub save_dir: PathBuf,
    /// Convert every annotated fingering instead of the first per piece.
    pub all_versions: bool,
    pub format: ExportFormat,
}

impl PreprocessConfig {
    pub fn new(dataset_dir: impl Into<PathBuf>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            save_dir: save_dir.into(),
            all_versions: false,
            format: ExportFormat::Json,
        }
    }
}

/// Cooperative cancellation: once set, pieces not yet started are
/// recorded as skipped while in-flight writes finish normally.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

enum PieceOutcome {
    Written { file: String, row_warnings: usize },
    Skipped { piece: SkippedPiece, row_warnings: usize },
}

pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Converts the selected fingering files into normalized per-piece
    /// files. Fatal errors (missing input, destination creation) are
    /// returned; per-piece failures land in the summary.
    pub fn run(&self, cancel: &CancelFlag) -> Result<RunSummary, DatasetError> {
        let dataset = PigDataset::open(&self.config.dataset_dir)?;
        // Created once, before any parallel writer starts.
        fs::create_dir_all(&self.config.save_dir)?;

        let sources: Vec<&FingeringSource> = if self.config.all_versions {
            dataset.sources().iter().collect()
        } else {
            dataset.single_finger_sources()
        };
        if !self.config.all_versions && sources.len() != EXPECTED_PIECES {
            warn!(
                found = sources.len(),
                expected = EXPECTED_PIECES,
                "piece count differs from the PIG v1.2 release"
            );
        }
        info!(pieces = sources.len(), "converting fingering files");

        let outcomes: Vec<PieceOutcome> = sources
            .par_iter()
            .map(|source| {
                if cancel.is_cancelled() {
                    PieceOutcome::Skipped {
                        piece: SkippedPiece {
                            source: source.file_name(),
                            reason: SkipReason::Cancelled,
                        },
                        row_warnings: 0,
                    }
                } else {
                    self.convert(&dataset, source)
                }
            })
            .collect();

        let mut summary = RunSummary::default();
        for outcome in outcomes {
            match outcome {
                PieceOutcome::Written { file, row_warnings } => {
                    summary.written.push(file);
                    summary.row_warnings += row_warnings;
                }
                PieceOutcome::Skipped {
                    piece,
                    row_warnings,
                } => {
                    summary.skipped.push(piece);
                    summary.row_warnings += row_warnings;
                }
            }
        }
        summary.written.sort();
        summary.skipped.sort_by(|a, b| a.source.cmp(&b.source));
        info!(
            written = summary.processed(),
            skipped = summary.skipped.len(),
            row_warnings = summary.row_warnings,
            "preprocess complete"
        );
        Ok(summary)
    }

    fn convert(&self, dataset: &PigDataset, source: &FingeringSource) -> PieceOutcome {
        let source_name = source.file_name();
        let skipped = |reason: SkipReason, row_warnings: usize| PieceOutcome::Skipped {
            piece: SkippedPiece {
                source: source_name.clone(),
                reason,
            },
            row_warnings,
        };

        let parsed = match parse_fingering_file(&source.path) {
            Ok(parsed) => parsed,
            Err(DatasetError::Io(err)) => return skipped(SkipReason::Io(err.to_string()), 0),
            Err(err) => return skipped(SkipReason::Format(err.to_string()), 0),
        };
        for issue in &parsed.issues {
            warn!(
                source = %source_name,
                line = issue.line_number,
                "excluding row: {}",
                issue.message
            );
        }
        let mut row_warnings = parsed.issues.len();

        let mut notes = Vec::with_capacity(parsed.records.len());
        for record in &parsed.records {
            match note_from_record(record) {
                Ok(note) => notes.push(note),
                Err(err) => {
                    row_warnings += 1;
                    warn!(
                        source = %source_name,
                        note_id = record.note_id,
                        "excluding row: {err}"
                    );
                }
            }
        }
        if notes.is_empty() {
            return skipped(
                SkipReason::Format("no valid annotation rows".to_string()),
                row_warnings,
            );
        }

        let piece_name = match dataset.catalog().normalized_name(source.piece_index) {
            Some(name) => name,
            None => {
                return skipped(
                    SkipReason::Format(format!(
                        "piece index {} not in List.csv",
                        source.piece_index
                    )),
                    row_warnings,
                )
            }
        };
        let piece = match PieceFingering::new(piece_name, source.version, notes) {
            Ok(piece) => piece,
            Err(err) => return skipped(SkipReason::Format(err.to_string()), row_warnings),
        };
        let bytes = match self.export(&piece) {
            Ok(bytes) => bytes,
            Err(err) => return skipped(SkipReason::Format(err.to_string()), row_warnings),
        };

        let file_name = format!("{}.{}", piece.file_stem(), self.config.format.extension());
        match self.write_atomic(&file_name, &bytes) {
            Ok(()) => PieceOutcome::Written {
                file: file_name,
                row_warnings,
            },
            Err(err) => skipped(SkipReason::Io(err.to_string()), row_warnings),
        }
    }

    fn export(&self, piece: &PieceFingering) -> Result<Vec<u8>, DatasetError> {
        match self.config.format {
            ExportFormat::Json => JsonExporter.export(piece, ExportFormat::Json),
            ExportFormat::Csv => CsvExporter.export(piece, ExportFormat::Csv),
        }
    }

    /// Writes to a temporary file in the destination directory, then
    /// renames into place, so a crash never leaves a half-written file
    /// visible to the readiness check.
    fn write_atomic(&self, file_name: &str, bytes: &[u8]) -> Result<(), DatasetError> {
        let mut tmp = NamedTempFile::new_in(&self.config.save_dir)?;
        tmp.write_all(bytes)?;
        tmp.persist(self.config.save_dir.join(file_name))
            .map_err(|err| DatasetError::Io(err.error))?;
        Ok(())
    }
}

fn note_from_record(record: &RawAnnotationRecord) -> Result<FingeredNote, DatasetError> {
    let pitch = note_name_to_midi_number(&record.pitch)?;
    let finger = record.finger()?;
    FingeredNote::new(
        record.onset_time,
        record.offset_time,
        pitch,
        record.onset_velocity,
        finger,
    )
}
