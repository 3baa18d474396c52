//! Folder and file-list conversion with per-file error isolation

use log::{error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::format::OutputFormat;
use crate::convert::lister::{DirectoryLister, FileLister};
use crate::convert::options::ConversionOptions;
use crate::convert::pipeline::convert_file;
use crate::convert::report::{BatchFailure, BatchReport, ConversionWarning};
use crate::tiff::errors::TiffError;
use crate::utils::progress::ProgressTracker;

/// Converts many files with one set of options
///
/// A failing file is recorded in the report and the batch moves on.
pub struct BatchConverter<L: FileLister = DirectoryLister> {
    lister: L,
    options: ConversionOptions,
    show_progress: bool,
}

impl BatchConverter<DirectoryLister> {
    /// Batch converter over `.tif` files in a directory
    pub fn with_directory_lister(options: ConversionOptions) -> Self {
        BatchConverter::new(DirectoryLister::default(), options)
    }
}

impl<L: FileLister> BatchConverter<L> {
    pub fn new(lister: L, options: ConversionOptions) -> Self {
        BatchConverter {
            lister,
            options,
            show_progress: false,
        }
    }

    /// Draw a console progress bar while converting
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Converts every file the lister finds in `input_dir`
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Directory handed to the lister
    /// * `output_dir` - Destination, created if absent
    /// * `format` - Output format for every file
    pub fn convert_folder(&self, input_dir: &Path, output_dir: &Path,
                          format: OutputFormat) -> ConvertResult<BatchReport> {
        let inputs = self.lister
            .list(input_dir)
            .map_err(|e| ConvertError::source_read(input_dir, TiffError::IoError(e)))?;

        fs::create_dir_all(output_dir).map_err(ConvertError::Io)?;

        if inputs.is_empty() {
            let warning = ConversionWarning::EmptyInput { dir: input_dir.to_path_buf() };
            warn!("{}", warning);
            let mut report = BatchReport::default();
            report.warnings.push(warning);
            return Ok(report);
        }

        info!("Found {} file(s) in {}", inputs.len(), input_dir.display());
        self.convert_files(&inputs, output_dir, format)
    }

    /// Converts each of `inputs` to `<output_dir>/<stem>.<ext>`
    ///
    /// An input whose output path was already written earlier in the batch
    /// fails instead of overwriting it.
    pub fn convert_files(&self, inputs: &[PathBuf], output_dir: &Path,
                         format: OutputFormat) -> ConvertResult<BatchReport> {
        // Bad options would fail every file the same way
        self.options.validate()?;

        let progress = if self.show_progress {
            ProgressTracker::new(inputs.len() as u64, "Converting")
        } else {
            ProgressTracker::hidden(inputs.len() as u64)
        };

        let mut report = BatchReport::default();
        let mut claimed = HashSet::new();
        for input in inputs {
            progress.set_message(&input.display().to_string());

            let result = output_path(input, output_dir, format).and_then(|output| {
                if !claimed.insert(output.clone()) {
                    return Err(ConvertError::Config(format!(
                        "{} is already the output of another input", output.display())));
                }
                convert_file(input, &output, &self.options)
            });

            match result {
                Ok(converted) => report.converted.push(converted),
                Err(e) => {
                    error!("Failed to convert {}: {}", input.display(), e);
                    report.failed.push(BatchFailure {
                        path: input.clone(),
                        error: e,
                    });
                }
            }
            progress.increment(1);
        }
        progress.finish();

        info!("Batch finished: {}", report);
        Ok(report)
    }
}

/// `<output_dir>/<stem of input>.<format extension>`
pub fn output_path(input: &Path, output_dir: &Path, format: OutputFormat) -> ConvertResult<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        ConvertError::Config(format!("{} has no file name", input.display()))
    })?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format.extension());
    Ok(output_dir.join(name))
}
