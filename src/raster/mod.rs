//! In-memory raster model
//!
//! Decoded band data in channel-last layout and the caller's choice of
//! which bands to load.

mod image;
mod selection;

pub use image::{RasterImage, SampleType};
pub use selection::ChannelSelection;
