//! Error types for the conversion pipeline

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::tiff::errors::TiffError;

/// Errors raised while converting a raster to a display image
#[derive(Debug)]
pub enum ConvertError {
    /// Source file missing, corrupt or not decodable
    SourceRead { path: PathBuf, reason: String },
    /// Unexpected band or dimension count
    Shape(String),
    /// No usable value range to normalize
    DegenerateRange(String),
    /// Invalid conversion option
    Config(String),
    /// Output image could not be encoded or written
    Encode { path: PathBuf, reason: String },
    /// I/O error outside of source reading and encoding
    Io(io::Error),
    /// Some files of a batch could not be converted
    BatchFailed { failed: usize, total: usize },
}

impl ConvertError {
    /// Wraps a decoder error as a source read failure for `path`
    pub fn source_read(path: impl Into<PathBuf>, error: TiffError) -> Self {
        ConvertError::SourceRead {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ConvertError::Encode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::SourceRead { path, reason } => {
                write!(f, "Cannot read source {}: {}", path.display(), reason)
            },
            ConvertError::Shape(msg) => write!(f, "Unexpected raster shape: {}", msg),
            ConvertError::DegenerateRange(msg) => write!(f, "Cannot normalize: {}", msg),
            ConvertError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            ConvertError::Encode { path, reason } => {
                write!(f, "Cannot write {}: {}", path.display(), reason)
            },
            ConvertError::Io(e) => write!(f, "I/O error: {}", e),
            ConvertError::BatchFailed { failed, total } => {
                write!(f, "{} of {} files failed to convert", failed, total)
            },
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(error: io::Error) -> Self {
        ConvertError::Io(error)
    }
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
