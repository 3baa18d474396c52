//! Raster analysis command
//!
//! Prints the structure and per-band value ranges of a TIFF without
//! converting it.

use clap::ArgMatches;
use log::{debug, info};
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::conversion_args::required_path;
use crate::convert::{analyze, ConvertResult};
use crate::utils::logger::Logger;

/// Command for analyzing a raster file
pub struct AnalyzeCommand<'a> {
    /// Path to the input file
    input_file: PathBuf,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches of the `analyze` subcommand
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Self> {
        Ok(AnalyzeCommand {
            input_file: required_path(args, "input")?,
            logger,
        })
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> ConvertResult<()> {
        info!("Analyzing file: {}", self.input_file.display());

        let report = analyze(&self.input_file)?;
        for line in report.to_string().lines() {
            info!("{}", line);
        }

        debug!("Analysis completed successfully");
        self.logger.log("Analysis completed successfully")?;

        Ok(())
    }
}
