//! Band Loader: TIFF pixel decoding into channel-last rasters

mod band_loader;
mod decoder;
mod layout;
mod predictor;
mod strip_reader;
mod tile_reader;

pub use band_loader::{BandLoader, LoadedRaster};
pub use layout::{Chunking, PlanarConfig, RasterLayout};
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;
