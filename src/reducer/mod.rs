//! Band Reducer: alpha removal and reduction to grayscale or RGB

mod alpha;
mod band_reducer;
mod channel_order;

pub use alpha::{detect_alpha, AlphaDetectionResult, ALPHA_PIXEL_FRACTION};
pub use band_reducer::{BandReducer, ReducedImage, ReducerOptions};
pub use channel_order::ChannelOrderCorrection;
