use std::path::PathBuf;

use grid_cutter::CutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid mode '{0}', expected train|test|all|mixed")]
    InvalidMode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to parse config {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Shape {
        path: PathBuf,
        #[source]
        source: CutError,
    },
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: PathBuf },
    #[error("image error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest record: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while validating options, before any work.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            GenError::InvalidMode(_) | GenError::Config(_) | GenError::ConfigFile { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
