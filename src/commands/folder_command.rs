//! Folder and file-list conversion commands

use clap::ArgMatches;
use log::{error, info};
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::conversion_args::{format_from_args, options_from_args, required_path};
use crate::convert::{BatchConverter, BatchReport, ConvertError, ConvertResult, OutputFormat};
use crate::utils::logger::Logger;

/// Converts every `.tif` file directly inside a directory
pub struct FolderConvertCommand<'a> {
    input_dir: PathBuf,
    output_dir: PathBuf,
    format: OutputFormat,
    converter: BatchConverter,
    logger: &'a Logger,
}

impl<'a> FolderConvertCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Self> {
        let converter = BatchConverter::with_directory_lister(options_from_args(args)?)
            .with_progress(args.get_flag("progress"));

        Ok(FolderConvertCommand {
            input_dir: required_path(args, "input")?,
            output_dir: required_path(args, "output")?,
            format: format_from_args(args)?,
            converter,
            logger,
        })
    }
}

impl<'a> Command for FolderConvertCommand<'a> {
    fn execute(&self) -> ConvertResult<()> {
        info!("Converting folder {} into {}", self.input_dir.display(), self.output_dir.display());
        let report = self.converter.convert_folder(&self.input_dir, &self.output_dir, self.format)?;
        finish_batch(&report, self.logger)
    }
}

/// Converts an explicit list of files into one directory
pub struct BatchConvertCommand<'a> {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    format: OutputFormat,
    converter: BatchConverter,
    logger: &'a Logger,
}

impl<'a> BatchConvertCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Self> {
        let inputs: Vec<PathBuf> = args.get_many::<String>("input")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();
        if inputs.is_empty() {
            return Err(ConvertError::Config("No input files given".to_string()));
        }

        let converter = BatchConverter::with_directory_lister(options_from_args(args)?)
            .with_progress(args.get_flag("progress"));

        Ok(BatchConvertCommand {
            inputs,
            output_dir: required_path(args, "output")?,
            format: format_from_args(args)?,
            converter,
            logger,
        })
    }
}

impl<'a> Command for BatchConvertCommand<'a> {
    fn execute(&self) -> ConvertResult<()> {
        info!("Converting {} file(s) into {}", self.inputs.len(), self.output_dir.display());
        let report = self.converter.convert_files(&self.inputs, &self.output_dir, self.format)?;
        finish_batch(&report, self.logger)
    }
}

/// Logs the batch outcome; any failed file makes the command fail
fn finish_batch(report: &BatchReport, logger: &Logger) -> ConvertResult<()> {
    for failure in &report.failed {
        error!("  {}: {}", failure.path.display(), failure.error);
    }
    logger.log(&format!("Batch: {}", report))?;

    if report.has_failures() {
        return Err(ConvertError::BatchFailed {
            failed: report.failed.len(),
            total: report.total(),
        });
    }

    info!("{}", report);
    Ok(())
}
