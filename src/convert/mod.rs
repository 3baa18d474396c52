//! Conversion pipeline: single files, batches and analysis
//!
//! Ties the band loader, band reducer and intensity normalizer together and
//! writes the result through the image encoder.

mod analyze;
mod batch;
pub mod encoder;
pub mod errors;
mod format;
mod lister;
mod options;
mod pipeline;
pub mod report;

pub use analyze::{analyze, band_statistics, AnalysisReport, BandStatistics};
pub use batch::{output_path, BatchConverter};
pub use errors::{ConvertError, ConvertResult};
pub use format::OutputFormat;
pub use lister::{DirectoryLister, FileLister};
pub use options::{ConversionOptions, DEFAULT_JPEG_QUALITY};
pub use pipeline::convert_file;
pub use report::{BatchFailure, BatchReport, ConversionReport, ConversionWarning};
