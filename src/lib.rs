pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod raster;
pub mod loader;
pub mod reducer;
pub mod normalize;
pub mod convert;
pub mod commands;
pub mod api;

pub use crate::api::Tif2Image;

pub use tiff::TiffReader;
pub use raster::{ChannelSelection, RasterImage, SampleType};
pub use loader::{BandLoader, LoadedRaster};
pub use reducer::{AlphaDetectionResult, BandReducer, ChannelOrderCorrection};
pub use normalize::{IntensityNormalizer, NormalizationPolicy};
pub use convert::{
    analyze, convert_file, BatchConverter, BatchReport, ConversionOptions, ConversionReport,
    ConversionWarning, ConvertError, ConvertResult, OutputFormat,
};
