use std::path::{Path, PathBuf};
use log::{info, LevelFilter};

use crate::convert::{
    self, AnalysisReport, BatchConverter, BatchReport, ConversionOptions, ConversionReport,
    ConvertResult, OutputFormat,
};
use crate::utils::logger::Logger;

/// Main interface to the tif2image library
pub struct Tif2Image {
    options: ConversionOptions,
    logger: Logger,
}

impl Tif2Image {
    /// Create a new instance converting with `options`
    ///
    /// Nothing is written to a log file until `with_log_file` is used.
    pub fn new(options: ConversionOptions) -> Self {
        Tif2Image {
            options,
            logger: Logger::silent(),
        }
    }

    /// Record a summary line per operation in `log_file`
    pub fn with_log_file(mut self, log_file: &Path) -> ConvertResult<Self> {
        self.logger = Logger::new(log_file, LevelFilter::Info)?;
        Ok(self)
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert one raster; the output extension selects PNG or JPEG
    ///
    /// # Arguments
    /// * `input_path` - Path to the input TIFF file
    /// * `output_path` - Path of the image to write
    pub fn convert(&self, input_path: &Path, output_path: &Path) -> ConvertResult<ConversionReport> {
        let report = convert::convert_file(input_path, output_path, &self.options)?;
        self.logger.log(&format!("Converted {}", report))?;
        Ok(report)
    }

    /// Convert every `.tif` file directly inside `input_dir`
    pub fn convert_folder(&self, input_dir: &Path, output_dir: &Path,
                          format: OutputFormat) -> ConvertResult<BatchReport> {
        let report = BatchConverter::with_directory_lister(self.options.clone())
            .convert_folder(input_dir, output_dir, format)?;
        self.logger.log(&format!("Folder {}: {}", input_dir.display(), report))?;
        Ok(report)
    }

    /// Convert a list of files into `output_dir`
    pub fn convert_files(&self, inputs: &[PathBuf], output_dir: &Path,
                         format: OutputFormat) -> ConvertResult<BatchReport> {
        let report = BatchConverter::with_directory_lister(self.options.clone())
            .convert_files(inputs, output_dir, format)?;
        self.logger.log(&format!("Batch: {}", report))?;
        Ok(report)
    }

    /// Describe a raster without converting it
    pub fn analyze(&self, input_path: &Path) -> ConvertResult<AnalysisReport> {
        let report = convert::analyze(input_path)?;
        info!("Analyzed {}", input_path.display());
        Ok(report)
    }
}

impl Default for Tif2Image {
    fn default() -> Self {
        Tif2Image::new(ConversionOptions::default())
    }
}
