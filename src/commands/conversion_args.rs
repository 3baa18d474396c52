//! Conversion options shared by the converting subcommands
//!
//! Options come from `--config` when given; individual flags override the
//! file values.

use clap::{Arg, ArgAction, ArgMatches};
use log::debug;
use std::path::{Path, PathBuf};

use crate::convert::{ConversionOptions, ConvertError, ConvertResult, OutputFormat};

/// The conversion flags, to be attached to a subcommand
pub fn conversion_args() -> Vec<Arg> {
    vec![
        Arg::new("bands")
            .long("bands")
            .help("Bands to load, comma separated (e.g. '2,1,0') or 'all' [default: 0,1,2]")
            .value_name("LIST"),
        Arg::new("bit-depth")
            .long("bit-depth")
            .help("Fixed divisor instead of min-max scaling (e.g. 4096 for 12-bit data)")
            .value_name("DIVISOR")
            .value_parser(clap::value_parser!(f64)),
        Arg::new("stretch")
            .long("stretch")
            .help("Use a percentile stretch instead of min-max scaling")
            .action(ArgAction::SetTrue),
        Arg::new("percentile")
            .long("percentile")
            .help("Percentile clipped at each end by --stretch [default: 1]")
            .value_name("P")
            .value_parser(clap::value_parser!(f64)),
        Arg::new("channel-order")
            .long("channel-order")
            .help("Channel reordering for RGB output (none, swap-rb, legacy) [default: none]")
            .value_name("ORDER"),
        Arg::new("remove-alpha-at-zero")
            .long("remove-alpha-at-zero")
            .help("Also drop an alpha channel detected at band 0")
            .action(ArgAction::SetTrue),
        Arg::new("quality")
            .long("quality")
            .help("JPEG quality 1-100 [default: 95]")
            .value_name("Q")
            .value_parser(clap::value_parser!(u8)),
        Arg::new("config")
            .long("config")
            .help("TOML file with conversion options")
            .value_name("FILE"),
    ]
}

/// Flags of the batch subcommands
pub fn batch_args() -> Vec<Arg> {
    vec![
        Arg::new("format")
            .long("format")
            .help("Output format (png, jpg)")
            .value_name("FORMAT")
            .default_value("png"),
        Arg::new("progress")
            .long("progress")
            .help("Show a progress bar")
            .action(ArgAction::SetTrue),
    ]
}

/// Builds the options from `--config` and the individual flags
pub fn options_from_args(args: &ArgMatches) -> ConvertResult<ConversionOptions> {
    let mut options = match args.get_one::<String>("config") {
        Some(path) => ConversionOptions::from_toml_file(Path::new(path))?,
        None => ConversionOptions::default(),
    };

    if let Some(bands) = args.get_one::<String>("bands") {
        options.channel_selection = bands.parse()?;
    }
    if let Some(divisor) = args.get_one::<f64>("bit-depth") {
        options.bit_depth_divisor = Some(*divisor);
    }
    if args.get_flag("stretch") {
        options.use_stretch = true;
    }
    if let Some(percentile) = args.get_one::<f64>("percentile") {
        options.stretch_percentile = *percentile;
    }
    if let Some(order) = args.get_one::<String>("channel-order") {
        options.channel_order = order.parse()?;
    }
    if args.get_flag("remove-alpha-at-zero") {
        options.remove_alpha_at_index_zero = true;
    }
    if let Some(quality) = args.get_one::<u8>("quality") {
        options.jpeg_quality = *quality;
    }

    options.validate()?;
    debug!("Conversion options: {:?}", options);
    Ok(options)
}

pub fn format_from_args(args: &ArgMatches) -> ConvertResult<OutputFormat> {
    args.get_one::<String>("format")
        .map(|f| f.parse())
        .unwrap_or(Ok(OutputFormat::default()))
}

pub fn required_path(args: &ArgMatches, name: &str) -> ConvertResult<PathBuf> {
    args.get_one::<String>(name)
        .map(PathBuf::from)
        .ok_or_else(|| ConvertError::Config(format!("Missing argument '{}'", name)))
}
