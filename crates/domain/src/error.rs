use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),
    #[error("unrecognized format: {0}")]
    Format(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    pub fn not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotFound(path.into())
    }

    pub fn format<T: Into<String>>(message: T) -> Self {
        Self::Format(message.into())
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }
}
