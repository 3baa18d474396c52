//! Command-line definition

use clap::{Arg, ArgAction, Command as ClapCommand};

use crate::commands::conversion_args::{batch_args, conversion_args};

/// Default log file, overridden with `--log-file`
pub const DEFAULT_LOG_FILE: &str = "tif2image.log";

/// Builds the `tif2image` argument parser
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("tif2image")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert multi-band GeoTIFF rasters to 8-bit PNG/JPEG images")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file path")
                .value_name("FILE")
                .global(true)
                .default_value(DEFAULT_LOG_FILE),
        )
        .subcommand(
            ClapCommand::new("convert")
                .about("Convert a single raster")
                .arg(
                    Arg::new("input")
                        .help("Input TIFF file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .help("Output image (.png, .jpg or .jpeg)")
                        .required(true)
                        .index(2),
                )
                .args(conversion_args()),
        )
        .subcommand(
            ClapCommand::new("folder-convert")
                .about("Convert every .tif file in a directory")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("Input directory")
                        .value_name("DIR")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_name("DIR")
                        .required(true),
                )
                .args(conversion_args())
                .args(batch_args()),
        )
        .subcommand(
            ClapCommand::new("batch-convert")
                .about("Convert a list of rasters into one directory")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("Input TIFF files")
                        .value_name("FILES")
                        .num_args(1..)
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_name("DIR")
                        .required(true),
                )
                .args(conversion_args())
                .args(batch_args()),
        )
        .subcommand(
            ClapCommand::new("analyze")
                .about("Describe a raster without converting it")
                .arg(
                    Arg::new("input")
                        .help("Input TIFF file")
                        .required(true)
                        .index(1),
                ),
        )
}
