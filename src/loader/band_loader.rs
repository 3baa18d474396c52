//! Band Loader
//!
//! Opens a TIFF, picks the full-resolution image and returns the selected
//! bands as a channel-last raster.

use log::{debug, info, warn};
use ndarray::Array3;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::report::ConversionWarning;
use crate::io::seekable::SeekableReader;
use crate::raster::{ChannelSelection, RasterImage};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;
use crate::tiff::{TiffReader, TIFF};
use super::layout::RasterLayout;
use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// Bands read from one file
#[derive(Debug, Clone)]
pub struct LoadedRaster {
    /// Selected bands, channel `i` holding source band `bands[i]`
    pub image: RasterImage,
    /// Band count of the source file
    pub source_bands: usize,
    pub bands: Vec<usize>,
    pub layout: RasterLayout,
    pub warnings: Vec<ConversionWarning>,
}

/// Reads rasters from TIFF and BigTIFF files
pub struct BandLoader;

impl BandLoader {
    /// Loads the bands named by `selection` from the file at `path`
    ///
    /// Any failure to open or decode the file is a `SourceRead` error.
    pub fn load(path: &Path, selection: &ChannelSelection) -> ConvertResult<LoadedRaster> {
        selection.validate()?;

        let file = File::open(path)
            .map_err(|e| ConvertError::source_read(path, TiffError::IoError(e)))?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        Self::load_from(&mut reader, path, selection)
    }

    /// Loads from an already opened source; `path` is only used in errors
    pub fn load_from(source: &mut dyn SeekableReader, path: &Path,
                     selection: &ChannelSelection) -> ConvertResult<LoadedRaster> {
        selection.validate()?;

        let (data, layout, bands, warning) = Self::decode(source, selection)
            .map_err(|e| ConvertError::source_read(path, e))?;

        let mut warnings = Vec::new();
        if let Some(warning) = warning {
            warn!("{}: {}", path.display(), warning);
            warnings.push(warning);
        }

        info!("Loaded bands {:?} of {} from {}", bands, layout.samples_per_pixel, path.display());

        Ok(LoadedRaster {
            image: RasterImage::new(data, layout.sample_type)?,
            source_bands: layout.samples_per_pixel,
            bands,
            layout,
            warnings,
        })
    }

    /// Parses the file structure and layout without decoding pixels
    pub fn inspect(path: &Path) -> ConvertResult<(TIFF, RasterLayout)> {
        let file = File::open(path)
            .map_err(|e| ConvertError::source_read(path, TiffError::IoError(e)))?;
        let mut reader = BufReader::new(file);

        Self::read_structure(&mut reader)
            .map(|(tiff, _, layout)| (tiff, layout))
            .map_err(|e| ConvertError::source_read(path, e))
    }

    fn read_structure(source: &mut dyn SeekableReader) -> TiffResult<(TIFF, TiffReader, RasterLayout)> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(source)?;

        let ifd = tiff.main_ifd()
            .ok_or_else(|| TiffError::GenericError("No image directory found".to_string()))?;
        let layout = RasterLayout::from_ifd(ifd, &tiff_reader, source)?;
        debug!("Main image IFD #{}: {}", ifd.number, layout);

        Ok((tiff, tiff_reader, layout))
    }

    #[allow(clippy::type_complexity)]
    fn decode(source: &mut dyn SeekableReader, selection: &ChannelSelection)
              -> TiffResult<(Array3<f64>, RasterLayout, Vec<usize>, Option<ConversionWarning>)> {
        let (tiff, tiff_reader, layout) = Self::read_structure(source)?;
        let ifd = tiff.main_ifd()
            .ok_or_else(|| TiffError::GenericError("No image directory found".to_string()))?;

        let (bands, warning) = selection.resolve(layout.samples_per_pixel);
        let file_size = validation::get_file_size(source)?;
        layout.checked_sample_count(bands.len(), file_size)?;
        let mut data = Array3::<f64>::zeros((layout.height, layout.width, bands.len()));

        if ifd.is_tiled() {
            TileReader::new(&mut *source, ifd, &tiff_reader, &layout).read_bands(&bands, &mut data)?;
        } else {
            StripReader::new(&mut *source, ifd, &tiff_reader, &layout).read_bands(&bands, &mut data)?;
        }

        Ok((data, layout, bands, warning))
    }
}
