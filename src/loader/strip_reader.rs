//! Strip-based band extraction
//!
//! Stripped TIFFs organize image data in horizontal strips across the
//! entire width of the image.

use log::{debug, trace};
use ndarray::Array3;

use crate::io::seekable::SeekableReader;
use crate::tiff::TiffReader;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::constants::tags;
use crate::tiff::validation;
use super::decoder::{self, ChunkDecoder, ChunkRegion};
use super::layout::{Chunking, RasterLayout};

/// Reads selected bands from stripped TIFF files
pub struct StripReader<'a, R: SeekableReader> {
    reader: R,
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
    layout: &'a RasterLayout,
}

impl<'a, R: SeekableReader> StripReader<'a, R> {
    /// Create a new strip reader
    ///
    /// # Arguments
    /// * `reader` - Seekable reader for the TIFF file
    /// * `ifd` - IFD containing the image metadata
    /// * `tiff_reader` - TIFF reader for accessing tag values
    /// * `layout` - Layout previously read from `ifd`
    pub fn new(reader: R, ifd: &'a IFD, tiff_reader: &'a TiffReader, layout: &'a RasterLayout) -> Self {
        StripReader {
            reader,
            ifd,
            tiff_reader,
            layout,
        }
    }

    fn rows_per_strip(&self) -> usize {
        match self.layout.chunking {
            Chunking::Strips { rows_per_strip } => rows_per_strip,
            Chunking::Tiles { tile_height, .. } => tile_height,
        }
    }

    /// Decodes the strips holding `bands` into `out`
    ///
    /// Channel `i` of `out` receives source band `bands[i]`. Strips with a
    /// zero byte count are sparse and leave their pixels at zero.
    pub fn read_bands(&mut self, bands: &[usize], out: &mut Array3<f64>) -> TiffResult<()> {
        let strip_offsets = self.tiff_reader.read_tag_values(&mut self.reader, self.ifd, tags::STRIP_OFFSETS)?;
        let strip_byte_counts = self.tiff_reader.read_tag_values(&mut self.reader, self.ifd, tags::STRIP_BYTE_COUNTS)?;
        decoder::check_chunk_tables(self.layout, &strip_offsets, &strip_byte_counts, "strips")?;

        let chunk_decoder = ChunkDecoder::new(self.layout)?;
        let file_size = validation::get_file_size(&mut self.reader)?;
        let rows_per_strip = self.rows_per_strip();
        let strips_per_plane = self.layout.chunks_per_plane();

        debug!("Reading {} strips of {} rows per plane ({})",
               strips_per_plane, rows_per_strip, chunk_decoder.compression_name());

        for plane in decoder::plane_targets(self.layout, bands) {
            for strip in 0..strips_per_plane {
                let index = plane.plane * strips_per_plane + strip;
                let (offset, byte_count) = (strip_offsets[index], strip_byte_counts[index]);
                if byte_count == 0 {
                    trace!("Strip {} is sparse", index);
                    continue;
                }

                let y = strip * rows_per_strip;
                let region = ChunkRegion {
                    x: 0,
                    y,
                    stored_width: self.layout.width,
                    stored_rows: rows_per_strip.min(self.layout.height - y),
                };

                trace!("Reading strip {} at offset {} with {} bytes", index, offset, byte_count);
                let compressed = chunk_decoder.read_chunk(&mut self.reader, offset, byte_count, file_size)?;
                let words = chunk_decoder.decode_words(&compressed, &region)?;
                chunk_decoder.place(&words, &region, &plane.targets, out);
            }
        }

        Ok(())
    }
}
