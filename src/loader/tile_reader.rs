//! Tile-based band extraction
//!
//! Tiled TIFF files organize image data in rectangular tiles of equal
//! size. Tiles on the right and bottom edges are padded; the padding is
//! dropped when copying.

use log::{debug, trace};
use ndarray::Array3;

use crate::io::seekable::SeekableReader;
use crate::tiff::TiffReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::constants::tags;
use crate::tiff::validation;
use super::decoder::{self, ChunkDecoder, ChunkRegion};
use super::layout::{Chunking, RasterLayout};

/// Reads selected bands from tiled TIFF files
pub struct TileReader<'a, R: SeekableReader> {
    reader: R,
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
    layout: &'a RasterLayout,
}

impl<'a, R: SeekableReader> TileReader<'a, R> {
    /// Create a new tile reader
    ///
    /// # Arguments
    /// * `reader` - Seekable reader for the TIFF file
    /// * `ifd` - IFD containing the image metadata
    /// * `tiff_reader` - TIFF reader for accessing tag values
    /// * `layout` - Layout previously read from `ifd`
    pub fn new(reader: R, ifd: &'a IFD, tiff_reader: &'a TiffReader, layout: &'a RasterLayout) -> Self {
        TileReader {
            reader,
            ifd,
            tiff_reader,
            layout,
        }
    }

    fn tile_dimensions(&self) -> TiffResult<(usize, usize)> {
        match self.layout.chunking {
            Chunking::Tiles { tile_width, tile_height } => Ok((tile_width, tile_height)),
            Chunking::Strips { .. } => Err(TiffError::GenericError("Image is not tiled".to_string())),
        }
    }

    /// Decodes the tiles holding `bands` into `out`
    ///
    /// Channel `i` of `out` receives source band `bands[i]`.
    pub fn read_bands(&mut self, bands: &[usize], out: &mut Array3<f64>) -> TiffResult<()> {
        let (tile_width, tile_height) = self.tile_dimensions()?;

        let tile_offsets = self.tiff_reader.read_tag_values(&mut self.reader, self.ifd, tags::TILE_OFFSETS)?;
        let tile_byte_counts = self.tiff_reader.read_tag_values(&mut self.reader, self.ifd, tags::TILE_BYTE_COUNTS)?;
        decoder::check_chunk_tables(self.layout, &tile_offsets, &tile_byte_counts, "tiles")?;

        let chunk_decoder = ChunkDecoder::new(self.layout)?;
        let file_size = validation::get_file_size(&mut self.reader)?;
        let tiles_across = self.layout.width.div_ceil(tile_width);
        let tiles_per_plane = self.layout.chunks_per_plane();

        debug!("Reading {} tiles of {}x{} per plane ({})",
               tiles_per_plane, tile_width, tile_height, chunk_decoder.compression_name());

        for plane in decoder::plane_targets(self.layout, bands) {
            for tile in 0..tiles_per_plane {
                let index = plane.plane * tiles_per_plane + tile;
                let (offset, byte_count) = (tile_offsets[index], tile_byte_counts[index]);
                if byte_count == 0 {
                    trace!("Tile {} is sparse", index);
                    continue;
                }

                let region = ChunkRegion {
                    x: (tile % tiles_across) * tile_width,
                    y: (tile / tiles_across) * tile_height,
                    stored_width: tile_width,
                    stored_rows: tile_height,
                };

                trace!("Reading tile {} at offset {} with {} bytes", index, offset, byte_count);
                let compressed = chunk_decoder.read_chunk(&mut self.reader, offset, byte_count, file_size)?;
                let words = chunk_decoder.decode_words(&compressed, &region)?;
                chunk_decoder.place(&words, &region, &plane.targets, out);
            }
        }

        Ok(())
    }
}
