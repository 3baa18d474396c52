//! Single-file conversion command
//!
//! This module implements the command for converting one GeoTIFF
//! into a PNG or JPEG image.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::conversion_args::{options_from_args, required_path};
use crate::convert::{convert_file, ConversionOptions, ConvertResult};
use crate::utils::logger::Logger;

/// Command for converting a single file
pub struct ConvertCommand<'a> {
    /// Path to the input raster
    input_file: PathBuf,
    /// Path to the output image; its extension selects the format
    output_file: PathBuf,
    options: ConversionOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ConvertCommand<'a> {
    /// Create a new convert command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches of the `convert` subcommand
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ConvertCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ConvertResult<Self> {
        Ok(ConvertCommand {
            input_file: required_path(args, "input")?,
            output_file: required_path(args, "output")?,
            options: options_from_args(args)?,
            logger,
        })
    }
}

impl<'a> Command for ConvertCommand<'a> {
    fn execute(&self) -> ConvertResult<()> {
        let report = convert_file(&self.input_file, &self.output_file, &self.options)?;

        info!("Wrote {} ({} channel(s))", report.output.display(), report.output_channels);
        self.logger.log(&format!("Converted {}", report))?;

        Ok(())
    }
}
