pub mod pipeline;
pub mod readiness;
pub mod report;

pub use crate::pipeline::{CancelFlag, PreprocessConfig, Preprocessor};
pub use crate::readiness::{check_dataset, ReadinessReport};
pub use crate::report::{RunSummary, SkipReason, SkippedPiece};
