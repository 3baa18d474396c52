//! Fixed channel permutations for 3-channel output

use std::fmt;
use std::str::FromStr;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::raster::RasterImage;

/// Permutation applied to a reduced 3-channel image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrderCorrection {
    /// Channels stay as loaded
    #[default]
    None,
    /// Output is input[2, 1, 0]
    SwapRbToBgr,
    /// Output is input[2, 0, 1]
    LegacyDefault,
}

impl ChannelOrderCorrection {
    pub fn permutation(&self) -> [usize; 3] {
        match self {
            ChannelOrderCorrection::None => [0, 1, 2],
            ChannelOrderCorrection::SwapRbToBgr => [2, 1, 0],
            ChannelOrderCorrection::LegacyDefault => [2, 0, 1],
        }
    }

    /// Reorders a 3-channel image; other channel counts pass through
    pub fn apply(&self, image: RasterImage) -> ConvertResult<RasterImage> {
        if image.channels() != 3 || *self == ChannelOrderCorrection::None {
            return Ok(image);
        }
        image.select_channels(&self.permutation())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelOrderCorrection::None => "none",
            ChannelOrderCorrection::SwapRbToBgr => "swap-rb",
            ChannelOrderCorrection::LegacyDefault => "legacy",
        }
    }
}

impl FromStr for ChannelOrderCorrection {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ChannelOrderCorrection::None),
            "swap-rb" | "swap_rb" | "bgr" => Ok(ChannelOrderCorrection::SwapRbToBgr),
            "legacy" | "legacy-default" => Ok(ChannelOrderCorrection::LegacyDefault),
            other => Err(ConvertError::Config(format!(
                "unknown channel order '{}' (expected none, swap-rb or legacy)", other))),
        }
    }
}

impl fmt::Display for ChannelOrderCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SampleType;
    use ndarray::Array3;

    fn rgb() -> RasterImage {
        let data = Array3::from_shape_fn((1, 1, 3), |(_, _, c)| (c + 1) as f64 * 10.0);
        RasterImage::new(data, SampleType::UInt8).unwrap()
    }

    fn pixel(image: &RasterImage) -> Vec<f64> {
        (0..image.channels()).map(|c| image.data()[[0, 0, c]]).collect()
    }

    #[test]
    fn test_permutations() {
        assert_eq!(pixel(&ChannelOrderCorrection::None.apply(rgb()).unwrap()), vec![10.0, 20.0, 30.0]);
        assert_eq!(pixel(&ChannelOrderCorrection::SwapRbToBgr.apply(rgb()).unwrap()), vec![30.0, 20.0, 10.0]);
        assert_eq!(pixel(&ChannelOrderCorrection::LegacyDefault.apply(rgb()).unwrap()), vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_single_channel_untouched() {
        let gray = RasterImage::new(Array3::from_elem((2, 2, 1), 5.0), SampleType::UInt8).unwrap();
        let out = ChannelOrderCorrection::SwapRbToBgr.apply(gray.clone()).unwrap();
        assert_eq!(out, gray);
    }

    #[test]
    fn test_parse() {
        assert_eq!("swap-rb".parse::<ChannelOrderCorrection>().unwrap(), ChannelOrderCorrection::SwapRbToBgr);
        assert_eq!("Legacy".parse::<ChannelOrderCorrection>().unwrap(), ChannelOrderCorrection::LegacyDefault);
        assert!("rgb".parse::<ChannelOrderCorrection>().is_err());
    }
}
