pub mod catalog;
pub mod dataset;
pub mod record;

pub use crate::catalog::PieceCatalog;
pub use crate::dataset::{FingeringSource, PigDataset, EXPECTED_PIECES};
pub use crate::record::{parse_fingering_file, ParsedFile, RawAnnotationRecord, RowIssue};
