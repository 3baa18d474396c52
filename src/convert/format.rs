//! Output image formats

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::convert::errors::{ConvertError, ConvertResult};

/// Encodings the converter can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Picks the format from the extension of `path`
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let extension = path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConvertError::Config(format!(
                "output {} has no extension (expected .png, .jpg or .jpeg)", path.display())))?;
        extension.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            other => Err(ConvertError::Config(format!(
                "unsupported output format '{}' (expected png, jpg or jpeg)", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        })
    }
}
