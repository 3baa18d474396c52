//! Band Reducer
//!
//! Collapses an arbitrary-channel raster to 1 or 3 channels, dropping a
//! detected alpha channel first.

use log::{debug, info, warn};
use ndarray::{s, stack, Array2, Axis};

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::report::ConversionWarning;
use crate::raster::RasterImage;
use super::alpha::{detect_alpha, AlphaDetectionResult};
use super::channel_order::ChannelOrderCorrection;

/// Policy knobs of the reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReducerOptions {
    /// Also drop an alpha channel detected at index 0
    pub remove_alpha_at_index_zero: bool,
    pub channel_order: ChannelOrderCorrection,
}

/// Output of a reduction
#[derive(Debug, Clone)]
pub struct ReducedImage {
    /// 1 or 3 channel raster
    pub image: RasterImage,
    pub alpha: AlphaDetectionResult,
    /// Channel count before reduction
    pub source_channels: usize,
    pub warnings: Vec<ConversionWarning>,
}

/// Reduces rasters to grayscale or RGB
#[derive(Debug, Clone, Default)]
pub struct BandReducer {
    options: ReducerOptions,
}

impl BandReducer {
    pub fn new(options: ReducerOptions) -> Self {
        BandReducer { options }
    }

    pub fn options(&self) -> &ReducerOptions {
        &self.options
    }

    /// Runs alpha removal, band-count reduction and channel reordering
    pub fn reduce(&self, image: RasterImage) -> ConvertResult<ReducedImage> {
        let source_channels = image.channels();
        if source_channels == 0 {
            return Err(ConvertError::Shape("raster has no channels".to_string()));
        }

        let mut warnings = Vec::new();
        let alpha = detect_alpha(&image);
        let image = self.remove_alpha(image, alpha)?;

        let reduced = match image.channels() {
            1 | 3 => image,
            2 => {
                warn!("Averaging 2 channels into one grayscale channel");
                warnings.push(ConversionWarning::TwoBandMerge);
                Self::merge_two_bands(&image)?
            },
            channels => {
                info!("Reducing {} bands to 3 channels", channels);
                Self::reduce_multispectral(&image, &mut warnings)?
            },
        };

        let reduced = self.options.channel_order.apply(reduced)?;
        debug!("Reduced {} channels to {}", source_channels, reduced.channels());

        Ok(ReducedImage {
            image: reduced,
            alpha,
            source_channels,
            warnings,
        })
    }

    fn remove_alpha(&self, image: RasterImage, alpha: AlphaDetectionResult) -> ConvertResult<RasterImage> {
        let Some(index) = alpha.channel() else {
            return Ok(image);
        };

        if image.channels() == 1 {
            debug!("Single channel reaches the global maximum; keeping it");
            return Ok(image);
        }

        if index == 0 && !self.options.remove_alpha_at_index_zero {
            info!("Alpha-like channel detected at index 0; keeping it");
            return Ok(image);
        }

        info!("Removing alpha channel at index {}", index);
        let keep: Vec<usize> = (0..image.channels()).filter(|&c| c != index).collect();
        image.select_channels(&keep)
    }

    /// Elementwise mean of two channels, without rounding
    fn merge_two_bands(image: &RasterImage) -> ConvertResult<RasterImage> {
        let mean = (&image.channel(0) + &image.channel(1)) / 2.0;
        RasterImage::new(mean.insert_axis(Axis(2)), image.sample_type())
    }

    /// Averages C > 3 channels into three groups
    ///
    /// With n = C / 3 the groups are [0, n), [n + 1, 2n) and [2n + 1, C - 1):
    /// band n, band 2n and the last band are skipped. An empty group takes
    /// the single band at its start, clamped to the last band.
    fn reduce_multispectral(image: &RasterImage, warnings: &mut Vec<ConversionWarning>) -> ConvertResult<RasterImage> {
        let channels = image.channels();
        let n = channels / 3;
        let groups = [(0, n), (n + 1, 2 * n), (2 * n + 1, channels - 1)];

        let mut outputs: Vec<Array2<f64>> = Vec::with_capacity(3);
        for (group, &(start, end)) in groups.iter().enumerate() {
            if start < end {
                debug!("Group {} averages bands {}..{}", group, start, end);
                let members = image.data().slice(s![.., .., start..end]);
                outputs.push(members.sum_axis(Axis(2)) / (end - start) as f64);
            } else {
                let band = start.min(channels - 1);
                warn!("Band group {} is empty, using band {} alone", group, band);
                warnings.push(ConversionWarning::EmptyBandGroup { group, band });
                outputs.push(image.channel(band).to_owned());
            }
        }

        let views: Vec<_> = outputs.iter().map(|o| o.view()).collect();
        let data = stack(Axis(2), &views).map_err(|e| ConvertError::Shape(e.to_string()))?;
        RasterImage::new(data, image.sample_type())
    }
}
