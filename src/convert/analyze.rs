//! Raster analysis without conversion

use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::convert::errors::ConvertResult;
use crate::io::byte_order::ByteOrder;
use crate::loader::{BandLoader, Chunking, RasterLayout};
use crate::raster::{ChannelSelection, RasterImage};
use crate::reducer::{detect_alpha, AlphaDetectionResult};

/// Value range of one band; `None` when the band has no finite sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    pub band: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// What `analyze` found in a file
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub path: PathBuf,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
    pub ifd_count: usize,
    pub overview_count: usize,
    pub layout: RasterLayout,
    pub bands: Vec<BandStatistics>,
    pub alpha: AlphaDetectionResult,
}

/// Reads every band of `input` and reports its structure and value ranges
pub fn analyze(input: &Path) -> ConvertResult<AnalysisReport> {
    let (tiff, layout) = BandLoader::inspect(input)?;
    let loaded = BandLoader::load(input, &ChannelSelection::All)?;

    let report = AnalysisReport {
        path: input.to_path_buf(),
        is_big_tiff: tiff.is_big_tiff,
        byte_order: tiff.byte_order,
        ifd_count: tiff.ifd_count(),
        overview_count: tiff.overviews().len(),
        layout,
        bands: band_statistics(&loaded.image),
        alpha: detect_alpha(&loaded.image),
    };
    info!("Analyzed {}: {} band(s), alpha {}", input.display(), report.bands.len(), report.alpha);

    Ok(report)
}

pub fn band_statistics(image: &RasterImage) -> Vec<BandStatistics> {
    (0..image.channels())
        .map(|band| {
            let finite = || image.channel(band).into_iter().copied().filter(|v| v.is_finite());
            BandStatistics {
                band,
                min: finite().reduce(f64::min),
                max: finite().reduce(f64::max),
            }
        })
        .collect()
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = &self.layout;
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  IFDs: {} ({} overview(s))", self.ifd_count, self.overview_count)?;
        writeln!(f, "  Dimensions: {}x{}", layout.width, layout.height)?;
        writeln!(f, "  Bands: {}", layout.samples_per_pixel)?;
        writeln!(f, "  Sample type: {} ({} bits)", layout.sample_type, layout.sample_type.bits())?;
        writeln!(f, "  Compression: {}", layout.compression_name())?;
        writeln!(f, "  Planar configuration: {}", layout.planar.name())?;
        match layout.chunking {
            Chunking::Strips { rows_per_strip } => {
                writeln!(f, "  Layout: {} strip(s) of {} rows", layout.chunks_per_plane(), rows_per_strip)?
            },
            Chunking::Tiles { tile_width, tile_height } => {
                writeln!(f, "  Layout: {} tile(s) of {}x{}", layout.chunks_per_plane(), tile_width, tile_height)?
            },
        }
        for stats in &self.bands {
            match (stats.min, stats.max) {
                (Some(min), Some(max)) => writeln!(f, "  Band {}: min {} max {}", stats.band, min, max)?,
                _ => writeln!(f, "  Band {}: no finite values", stats.band)?,
            }
        }
        write!(f, "  Alpha: {}", self.alpha)
    }
}
