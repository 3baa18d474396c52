//! Chunk decoding shared by the strip and tile readers
//!
//! A chunk is one strip or one tile. Decoding turns its compressed bytes
//! into sample words, and placement copies the selected samples into the
//! channel-last output array.

use std::io::{Read, Seek, SeekFrom};
use ndarray::Array3;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;
use super::layout::{PlanarConfig, RasterLayout};
use super::predictor as predictors;

/// Samples of one plane to copy: (sample index inside a chunk pixel, output channel)
pub(crate) struct PlaneTargets {
    pub plane: usize,
    pub targets: Vec<(usize, usize)>,
}

/// Where a decoded chunk lands in the image
pub(crate) struct ChunkRegion {
    pub x: usize,
    pub y: usize,
    /// Pixels per stored chunk row
    pub stored_width: usize,
    /// Rows stored in the chunk
    pub stored_rows: usize,
}

pub(crate) struct ChunkDecoder<'a> {
    layout: &'a RasterLayout,
    handler: Box<dyn CompressionHandler>,
}

impl<'a> ChunkDecoder<'a> {
    pub fn new(layout: &'a RasterLayout) -> TiffResult<Self> {
        let handler = CompressionFactory::create_handler(layout.compression)?;
        Ok(ChunkDecoder { layout, handler })
    }

    pub fn compression_name(&self) -> &'static str {
        self.handler.name()
    }

    /// Reads the raw bytes of a chunk, checking they lie inside the file
    pub fn read_chunk(&self, reader: &mut dyn SeekableReader, offset: u64, byte_count: u64,
                      file_size: u64) -> TiffResult<Vec<u8>> {
        validation::validate_data_block(offset, byte_count, file_size)?;

        reader.seek(SeekFrom::Start(offset))?;
        let mut compressed = vec![0u8; byte_count as usize];
        reader.read_exact(&mut compressed)?;
        Ok(compressed)
    }

    /// Decompresses a chunk and reverses its predictor
    pub fn decode_words(&self, compressed: &[u8], region: &ChunkRegion) -> TiffResult<Vec<u64>> {
        let samples_per_pixel = self.layout.samples_per_chunk_pixel();
        let bytes_per_sample = self.layout.sample_type.bytes();

        let row_samples = region.stored_width * samples_per_pixel;
        let expected = row_samples
            .checked_mul(region.stored_rows)
            .and_then(|n| n.checked_mul(bytes_per_sample))
            .ok_or_else(|| TiffError::GenericError("Chunk size overflows".to_string()))?;

        let mut bytes = self.handler.decompress(compressed, expected)?;
        if bytes.len() < expected {
            return Err(TiffError::DecompressionError(format!(
                "{} chunk decoded to {} bytes, expected {}",
                self.handler.name(), bytes.len(), expected)));
        }
        bytes.truncate(expected);

        if self.layout.predictor == predictor::FLOATING_POINT {
            return Ok(predictors::undo_floating_point(&mut bytes, row_samples, samples_per_pixel, bytes_per_sample));
        }

        let byte_order = self.layout.byte_order;
        let mut words: Vec<u64> = bytes
            .chunks_exact(bytes_per_sample)
            .map(|sample| byte_order.word_from_bytes(sample))
            .collect();

        if self.layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
            predictors::undo_horizontal(&mut words, row_samples, samples_per_pixel, self.layout.sample_type.bits());
        }

        Ok(words)
    }

    /// Copies the targeted samples of a decoded chunk into `out`
    ///
    /// Chunk pixels beyond the image edge (tile padding) are dropped.
    pub fn place(&self, words: &[u64], region: &ChunkRegion, targets: &[(usize, usize)], out: &mut Array3<f64>) {
        let samples_per_pixel = self.layout.samples_per_chunk_pixel();
        let sample_type = self.layout.sample_type;
        let valid_rows = region.stored_rows.min(self.layout.height.saturating_sub(region.y));
        let valid_cols = region.stored_width.min(self.layout.width.saturating_sub(region.x));

        for row in 0..valid_rows {
            for col in 0..valid_cols {
                let base = (row * region.stored_width + col) * samples_per_pixel;
                for &(sample, channel) in targets {
                    if let Some(&word) = words.get(base + sample) {
                        out[[region.y + row, region.x + col, channel]] = sample_type.word_to_f64(word);
                    }
                }
            }
        }
    }
}

/// Groups the selected bands by the plane they are stored in
///
/// Chunky files keep every band in plane 0; planar files store band `b`
/// in plane `b`, so unselected planes are never read.
pub(crate) fn plane_targets(layout: &RasterLayout, bands: &[usize]) -> Vec<PlaneTargets> {
    match layout.planar {
        PlanarConfig::Chunky => vec![PlaneTargets {
            plane: 0,
            targets: bands.iter().enumerate().map(|(channel, &band)| (band, channel)).collect(),
        }],
        PlanarConfig::Planar => {
            let mut planes: Vec<PlaneTargets> = Vec::new();
            for (channel, &band) in bands.iter().enumerate() {
                match planes.iter_mut().find(|p| p.plane == band) {
                    Some(existing) => existing.targets.push((0, channel)),
                    None => planes.push(PlaneTargets { plane: band, targets: vec![(0, channel)] }),
                }
            }
            planes
        },
    }
}

/// Checks that the offset and byte count tables cover every chunk
pub(crate) fn check_chunk_tables(layout: &RasterLayout, offsets: &[u64], byte_counts: &[u64],
                                 kind: &str) -> TiffResult<()> {
    let expected = layout.expected_chunk_count();
    if offsets.len() < expected || byte_counts.len() < expected {
        return Err(TiffError::GenericError(format!(
            "Expected {} {}, found {} offsets and {} byte counts",
            expected, kind, offsets.len(), byte_counts.len())));
    }
    Ok(())
}
