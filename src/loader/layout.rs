//! Image layout derived from the main IFD

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::raster::SampleType;
use crate::tiff::constants::{planar_config, predictor, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;
use crate::compression::CompressionFactory;
use crate::utils::tag_utils;

/// Most decoded samples a single raster may hold
pub const MAX_RASTER_SAMPLES: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// How far compressed pixel data may expand relative to the file size
pub const MAX_EXPANSION_RATIO: u64 = 4096;

/// How pixel data is cut into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunking {
    Strips { rows_per_strip: usize },
    Tiles { tile_width: usize, tile_height: usize },
}

/// How the samples of a pixel are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarConfig {
    /// Samples interleaved per pixel
    Chunky,
    /// One plane per band
    Planar,
}

impl PlanarConfig {
    pub fn name(&self) -> &'static str {
        tag_utils::get_planar_config_name(match self {
            PlanarConfig::Chunky => planar_config::CHUNKY as u64,
            PlanarConfig::Planar => planar_config::PLANAR as u64,
        })
    }
}

/// Everything needed to decode the pixel data of one IFD
#[derive(Debug, Clone)]
pub struct RasterLayout {
    pub width: usize,
    pub height: usize,
    pub samples_per_pixel: usize,
    pub sample_type: SampleType,
    pub compression: u64,
    pub predictor: u16,
    pub planar: PlanarConfig,
    pub chunking: Chunking,
    pub byte_order: ByteOrder,
}

impl RasterLayout {
    /// Reads and validates the layout tags of `ifd`
    pub fn from_ifd(ifd: &IFD, tiff_reader: &TiffReader, source: &mut dyn SeekableReader) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        if width == 0 || height == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let samples_per_pixel = ifd.get_samples_per_pixel() as usize;
        if samples_per_pixel == 0 {
            return Err(TiffError::UnsupportedSampleLayout("SamplesPerPixel is 0".to_string()));
        }

        let bits = Self::uniform_tag(ifd, tiff_reader, source, tags::BITS_PER_SAMPLE, 1)?;
        let format = Self::uniform_tag(ifd, tiff_reader, source, tags::SAMPLE_FORMAT, 1)?;
        let sample_type = SampleType::from_tiff(format, bits).ok_or_else(|| {
            TiffError::UnsupportedSampleLayout(format!(
                "{}-bit samples with sample format {}", bits, format))
        })?;

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1);
        if !CompressionFactory::is_supported(compression) {
            return Err(TiffError::UnsupportedCompression(compression));
        }

        let predictor_code = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(1) as u16;
        match predictor_code {
            predictor::NONE => {},
            predictor::HORIZONTAL_DIFFERENCING if !sample_type.is_float() => {},
            predictor::FLOATING_POINT if sample_type.is_float() => {},
            _ => {
                return Err(TiffError::UnsupportedSampleLayout(format!(
                    "predictor {} with {} samples", predictor_code, sample_type)));
            },
        }

        let planar = match ifd.get_tag_value(tags::PLANAR_CONFIGURATION).unwrap_or(1) as u16 {
            planar_config::CHUNKY => PlanarConfig::Chunky,
            planar_config::PLANAR => PlanarConfig::Planar,
            other => {
                return Err(TiffError::UnsupportedSampleLayout(format!(
                    "planar configuration {}", other)));
            },
        };

        let chunking = if ifd.is_tiled() {
            let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0) as usize;
            let tile_height = ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0) as usize;
            if tile_width == 0 || tile_height == 0 {
                return Err(TiffError::GenericError("Tile dimensions must be non-zero".to_string()));
            }
            Chunking::Tiles { tile_width, tile_height }
        } else {
            let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
                .unwrap_or(height)
                .clamp(1, height) as usize;
            Chunking::Strips { rows_per_strip }
        };

        Ok(RasterLayout {
            width: width as usize,
            height: height as usize,
            samples_per_pixel,
            sample_type,
            compression,
            predictor: predictor_code,
            planar,
            chunking,
            byte_order: tiff_reader.byte_order()?,
        })
    }

    /// Reads a per-sample tag and requires every sample to agree
    fn uniform_tag(ifd: &IFD, tiff_reader: &TiffReader, source: &mut dyn SeekableReader,
                   tag: u16, default: u16) -> TiffResult<u16> {
        if !ifd.has_tag(tag) {
            return Ok(default);
        }

        let values = tiff_reader.read_tag_values(source, ifd, tag)?;
        let first = values.first().copied().unwrap_or(default as u64);
        if values.iter().any(|&v| v != first) {
            return Err(TiffError::UnsupportedSampleLayout(format!(
                "mixed values for {}: {:?}", tag_utils::get_tag_name(tag), values)));
        }

        Ok(first as u16)
    }

    /// Samples stored per pixel inside one chunk
    pub fn samples_per_chunk_pixel(&self) -> usize {
        match self.planar {
            PlanarConfig::Chunky => self.samples_per_pixel,
            PlanarConfig::Planar => 1,
        }
    }

    /// Number of chunks making up one plane (or the whole image when chunky)
    pub fn chunks_per_plane(&self) -> usize {
        match self.chunking {
            Chunking::Strips { rows_per_strip } => self.height.div_ceil(rows_per_strip),
            Chunking::Tiles { tile_width, tile_height } => {
                self.width.div_ceil(tile_width) * self.height.div_ceil(tile_height)
            },
        }
    }

    /// Total number of chunks the offset tags must list
    pub fn expected_chunk_count(&self) -> usize {
        match self.planar {
            PlanarConfig::Chunky => self.chunks_per_plane(),
            PlanarConfig::Planar => self.chunks_per_plane() * self.samples_per_pixel,
        }
    }

    /// Checks the declared size before anything is allocated for it
    ///
    /// Returns the sample count of a raster holding `channels` bands. The
    /// stored size must fit the file once expanded by `MAX_EXPANSION_RATIO`.
    pub fn checked_sample_count(&self, channels: usize, file_size: u64) -> TiffResult<usize> {
        let too_large = || TiffError::GenericError(format!(
            "Declared raster {}x{} with {} band(s) is too large for a {}-byte file",
            self.width, self.height, self.samples_per_pixel, file_size));

        let samples = self.height.checked_mul(self.width)
            .and_then(|n| n.checked_mul(channels))
            .filter(|&n| n <= MAX_RASTER_SAMPLES)
            .ok_or_else(too_large)?;

        let stored_bytes = (self.height as u64).checked_mul(self.width as u64)
            .and_then(|n| n.checked_mul(self.samples_per_pixel as u64))
            .and_then(|n| n.checked_mul(self.sample_type.bytes() as u64))
            .ok_or_else(too_large)?;
        if stored_bytes > file_size.saturating_mul(MAX_EXPANSION_RATIO) {
            return Err(too_large());
        }

        Ok(samples)
    }

    pub fn compression_name(&self) -> &'static str {
        tag_utils::get_compression_name(self.compression)
    }
}

impl fmt::Display for RasterLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}, {} band(s) of {}, {}, {}, ",
               self.width, self.height, self.samples_per_pixel, self.sample_type,
               self.compression_name(), self.planar.name())?;
        match self.chunking {
            Chunking::Strips { rows_per_strip } => write!(f, "strips of {} rows", rows_per_strip),
            Chunking::Tiles { tile_width, tile_height } => write!(f, "{}x{} tiles", tile_width, tile_height),
        }
    }
}
