//! Non-fatal conversion warnings and per-file / per-batch reports

use std::fmt;
use std::path::PathBuf;

use crate::convert::errors::ConvertError;
use crate::raster::SampleType;
use crate::reducer::AlphaDetectionResult;

/// Conditions worth reporting that do not stop a conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionWarning {
    /// Divided values reach the top of the 8-bit range; the divisor is likely too small
    BitDepth { max_value: f64, divisor: f64 },
    /// No matching source files were found
    EmptyInput { dir: PathBuf },
    /// Two channels were averaged into one grayscale channel
    TwoBandMerge,
    /// Requested bands could not be honoured; all bands were used instead
    BandFallback { requested: Vec<usize>, available: usize },
    /// A multispectral group was empty; a single band stands in for it
    EmptyBandGroup { group: usize, band: usize },
    /// NaN or infinite samples were mapped to 0
    NonFiniteValues { count: usize },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::BitDepth { max_value, divisor } => write!(
                f,
                "maximum scaled value {:.1} with divisor {} suggests a wrong bit depth",
                max_value, divisor
            ),
            ConversionWarning::EmptyInput { dir } => {
                write!(f, "no .tif files found in {}", dir.display())
            },
            ConversionWarning::TwoBandMerge => {
                write!(f, "two channels averaged into one grayscale channel")
            },
            ConversionWarning::BandFallback { requested, available } => write!(
                f,
                "bands {:?} not available in a {}-band raster, using all bands",
                requested, available
            ),
            ConversionWarning::EmptyBandGroup { group, band } => write!(
                f,
                "band group {} is empty, using band {} alone",
                group, band
            ),
            ConversionWarning::NonFiniteValues { count } => {
                write!(f, "{} non-finite samples mapped to 0", count)
            },
        }
    }
}

/// Outcome of converting one file
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Bands present in the source file
    pub source_bands: usize,
    /// Channels after band selection
    pub loaded_channels: usize,
    /// Channels in the written image (1 or 3)
    pub output_channels: usize,
    pub sample_type: SampleType,
    pub alpha: AlphaDetectionResult,
    pub warnings: Vec<ConversionWarning>,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} bands, {}, {} -> {} channels",
            self.input.display(),
            self.output.display(),
            self.source_bands,
            self.sample_type,
            self.loaded_channels,
            self.output_channels
        )?;
        if let AlphaDetectionResult::Channel(index) = self.alpha {
            write!(f, ", alpha at {}", index)?;
        }
        write!(f, ")")
    }
}

/// A file that failed inside a batch
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// Outcome of a batch conversion
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConversionReport>,
    pub failed: Vec<BatchFailure>,
    pub warnings: Vec<ConversionWarning>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} files converted, {} failed",
            self.converted.len(),
            self.total(),
            self.failed.len()
        )
    }
}
