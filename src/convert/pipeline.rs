//! Single-file conversion: load, reduce, normalize, encode

use log::{info, warn};
use std::path::Path;

use crate::convert::encoder;
use crate::convert::errors::ConvertResult;
use crate::convert::format::OutputFormat;
use crate::convert::options::ConversionOptions;
use crate::convert::report::ConversionReport;
use crate::loader::BandLoader;
use crate::normalize::IntensityNormalizer;
use crate::reducer::BandReducer;

/// Converts the raster at `input` to the PNG or JPEG at `output`
///
/// The format comes from the output extension and is checked, along with
/// every option, before the input is opened. Errors propagate to the
/// caller; no partial output file is left behind.
pub fn convert_file(input: &Path, output: &Path, options: &ConversionOptions) -> ConvertResult<ConversionReport> {
    let format = OutputFormat::from_path(output)?;
    options.validate()?;
    let policy = options.normalization_policy()?;

    info!("Converting {} -> {} ({})", input.display(), output.display(), policy);

    let loaded = BandLoader::load(input, &options.channel_selection)?;
    let mut warnings = loaded.warnings;
    let source_bands = loaded.source_bands;
    let sample_type = loaded.image.sample_type();
    let loaded_channels = loaded.image.channels();

    let reduced = BandReducer::new(options.reducer_options()).reduce(loaded.image)?;
    warnings.extend(reduced.warnings);

    let normalized = IntensityNormalizer::new(policy).normalize(&reduced.image)?;
    let output_channels = normalized.channels();
    warnings.extend(normalized.warnings);

    encoder::write_image(&normalized.data, output, format, options.jpeg_quality)?;

    for warning in &warnings {
        warn!("{}: {}", input.display(), warning);
    }

    let report = ConversionReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        source_bands,
        loaded_channels,
        output_channels,
        sample_type,
        alpha: reduced.alpha,
        warnings,
    };
    info!("Converted {}", report);

    Ok(report)
}
