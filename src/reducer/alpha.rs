//! Alpha / mask channel detection

use std::fmt;
use ndarray::Axis;

use crate::raster::RasterImage;

/// Share of pixels at the global maximum above which a channel counts as alpha
pub const ALPHA_PIXEL_FRACTION: f64 = 0.8;

/// Which channel, if any, behaves like an alpha or mask channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaDetectionResult {
    #[default]
    None,
    Channel(usize),
}

impl AlphaDetectionResult {
    pub fn channel(&self) -> Option<usize> {
        match self {
            AlphaDetectionResult::None => None,
            AlphaDetectionResult::Channel(index) => Some(*index),
        }
    }
}

impl fmt::Display for AlphaDetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlphaDetectionResult::None => f.write_str("none"),
            AlphaDetectionResult::Channel(index) => write!(f, "channel {}", index),
        }
    }
}

/// Finds the channel most saturated at the image-wide maximum
///
/// Per channel, counts the pixels whose value reaches the global maximum of
/// the whole image. The channel with the highest count (lowest index on
/// ties) is alpha when that count is above 80% of the pixel count.
/// Non-finite samples are ignored.
pub fn detect_alpha(image: &RasterImage) -> AlphaDetectionResult {
    let global_max = image
        .data()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if !global_max.is_finite() {
        return AlphaDetectionResult::None;
    }

    let mut best: Option<(usize, usize)> = None;
    for (index, channel) in image.data().axis_iter(Axis(2)).enumerate() {
        let count = channel.iter().filter(|&&v| v >= global_max).count();
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((index, count));
        }
    }

    let threshold = ALPHA_PIXEL_FRACTION * image.pixel_count() as f64;
    match best {
        Some((index, count)) if count as f64 > threshold => AlphaDetectionResult::Channel(index),
        _ => AlphaDetectionResult::None,
    }
}
