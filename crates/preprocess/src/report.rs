use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    /// The file's structure was unrecognized or no row survived parsing.
    Format(String),
    /// The normalized file could not be written.
    Io(String),
    /// The run was cancelled before this piece was processed.
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Format(message) => write!(f, "unrecognized format: {message}"),
            SkipReason::Io(message) => write!(f, "write failed: {message}"),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedPiece {
    /// Source file name the piece came from.
    pub source: String,
    pub reason: SkipReason,
}

/// What one preprocessing invocation did.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Normalized file names written, sorted.
    pub written: Vec<String>,
    pub skipped: Vec<SkippedPiece>,
    /// Rows excluded across all pieces.
    pub row_warnings: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.written.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reasons_render() {
        let reason = SkipReason::Format("no valid annotation rows".to_string());
        assert_eq!(
            reason.to_string(),
            "unrecognized format: no valid annotation rows"
        );
        assert_eq!(SkipReason::Cancelled.to_string(), "cancelled");
    }
}
