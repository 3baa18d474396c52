//! Intensity Normalizer
//!
//! Maps reduced rasters of any numeric range to 8-bit samples.

use log::{debug, warn};
use ndarray::Array3;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::report::ConversionWarning;
use crate::raster::RasterImage;
use super::percentile::percentiles;
use super::policy::NormalizationPolicy;

/// Value ranges narrower than this are treated as flat
pub const DEGENERATE_EPSILON: f64 = 1e-5;

/// Scaled maximum above which a fixed divisor is suspected to be too small
const BIT_DEPTH_WARNING_LEVEL: f64 = 254.0;

/// 8-bit output of the normalizer, same (H, W, C) shape as its input
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub data: Array3<u8>,
    pub warnings: Vec<ConversionWarning>,
}

impl NormalizedImage {
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }
}

/// Applies a `NormalizationPolicy`
#[derive(Debug, Clone, Default)]
pub struct IntensityNormalizer {
    policy: NormalizationPolicy,
}

impl IntensityNormalizer {
    pub fn new(policy: NormalizationPolicy) -> Self {
        IntensityNormalizer { policy }
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Normalizes `image` to [0, 255]
    ///
    /// Non-finite samples become 0 and raise a warning. Fails with
    /// `DegenerateRange` only when the image holds no finite sample at all.
    pub fn normalize(&self, image: &RasterImage) -> ConvertResult<NormalizedImage> {
        self.policy.validate()?;

        let data = image.data();
        let mut finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err(ConvertError::DegenerateRange("image holds no finite values".to_string()));
        }

        let mut warnings = Vec::new();
        let non_finite = data.len() - finite.len();
        if non_finite > 0 {
            warn!("{} non-finite samples mapped to 0", non_finite);
            warnings.push(ConversionWarning::NonFiniteValues { count: non_finite });
        }

        let output = match self.policy {
            NormalizationPolicy::MinMax { divisor: Some(divisor) } => {
                let scaled = data.mapv(|v| if v.is_finite() { clip_to_byte_range(v / divisor * 255.0) } else { f64::NAN });
                let max_value = scaled.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
                if max_value > BIT_DEPTH_WARNING_LEVEL {
                    warn!("Maximum scaled value {:.1} with divisor {}; bit depth may be wrong", max_value, divisor);
                    warnings.push(ConversionWarning::BitDepth { max_value, divisor });
                }
                scaled.mapv(truncate)
            },
            NormalizationPolicy::MinMax { divisor: None } => {
                let (low, high) = finite.iter().fold((f64::INFINITY, f64::NEG_INFINITY),
                                                     |(lo, hi), &v| (lo.min(v), hi.max(v)));
                debug!("Min-max range [{}, {}]", low, high);
                Self::linear_map(data, low, high)
            },
            NormalizationPolicy::PercentileStretch { percentile } => {
                let bounds = percentiles(&mut finite, &[percentile, 100.0 - percentile]);
                let (low, high) = (bounds[0], bounds[1]);
                debug!("{}% stretch range [{}, {}]", percentile, low, high);
                Self::linear_map(data, low, high)
            },
        };

        Ok(NormalizedImage { data: output, warnings })
    }

    /// Maps [low, high] onto [0, 255] with rounding half to even
    ///
    /// A flat range clips the raw values instead.
    fn linear_map(data: &Array3<f64>, low: f64, high: f64) -> Array3<u8> {
        let range = high - low;
        if range < DEGENERATE_EPSILON {
            debug!("Flat value range; clipping raw values");
            return data.mapv(|v| if v.is_finite() { truncate(clip_to_byte_range(v)) } else { 0 });
        }

        data.mapv(|v| {
            if !v.is_finite() {
                return 0;
            }
            let scaled = ((v - low) / range * 255.0).round_ties_even();
            truncate(clip_to_byte_range(scaled))
        })
    }
}

fn clip_to_byte_range(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}

/// Casts an in-range value to u8; NaN becomes 0
fn truncate(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SampleType;

    fn image(data: Array3<f64>) -> RasterImage {
        RasterImage::new(data, SampleType::Float32).unwrap()
    }

    fn minmax() -> IntensityNormalizer {
        IntensityNormalizer::default()
    }

    #[test]
    fn test_minmax_is_idempotent_on_8bit() {
        let mut data = Array3::from_shape_fn((4, 4, 3), |(y, x, c)| (((y * 4 + x) * 17 + c * 5) % 256) as f64);
        data[[0, 0, 1]] = 0.0;
        data[[3, 3, 2]] = 255.0;

        let out = minmax().normalize(&image(data.clone())).unwrap();
        assert_eq!(out.data, data.mapv(|v| v as u8));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_minmax_global_range() {
        let mut data = Array3::zeros((1, 3, 1));
        data[[0, 0, 0]] = 100.0;
        data[[0, 1, 0]] = 150.0;
        data[[0, 2, 0]] = 200.0;

        let out = minmax().normalize(&image(data)).unwrap();
        // 127.5 rounds half to even
        assert_eq!(out.data.iter().copied().collect::<Vec<u8>>(), vec![0, 128, 255]);
    }

    #[test]
    fn test_divisor_scales_and_truncates() {
        let mut data = Array3::zeros((1, 3, 1));
        data[[0, 0, 0]] = 1000.0;
        data[[0, 1, 0]] = 2048.0;
        data[[0, 2, 0]] = 9000.0;

        let normalizer = IntensityNormalizer::new(NormalizationPolicy::MinMax { divisor: Some(4096.0) });
        let out = normalizer.normalize(&image(data)).unwrap();
        assert_eq!(out.data.iter().copied().collect::<Vec<u8>>(), vec![62, 127, 255]);
        assert_eq!(out.warnings, vec![ConversionWarning::BitDepth { max_value: 255.0, divisor: 4096.0 }]);
    }

    #[test]
    fn test_divisor_without_saturation_has_no_warning() {
        let data = Array3::from_elem((2, 2, 1), 512.0);
        let normalizer = IntensityNormalizer::new(NormalizationPolicy::MinMax { divisor: Some(1024.0) });
        let out = normalizer.normalize(&image(data)).unwrap();
        assert!(out.data.iter().all(|&v| v == 127));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_stretch_clips_at_percentiles() {
        let data = Array3::from_shape_fn((1, 101, 1), |(_, x, _)| x as f64);
        let normalizer = IntensityNormalizer::new(NormalizationPolicy::PercentileStretch { percentile: 1.0 });
        let out = normalizer.normalize(&image(data)).unwrap();

        assert_eq!(out.data[[0, 0, 0]], 0);
        assert_eq!(out.data[[0, 1, 0]], 0);
        assert_eq!(out.data[[0, 99, 0]], 255);
        assert_eq!(out.data[[0, 100, 0]], 255);
        // 50 sits mid-range: (49 / 98) * 255 = 127.5 -> 128
        assert_eq!(out.data[[0, 50, 0]], 128);
    }

    #[test]
    fn test_flat_image_does_not_fail() {
        for (value, expected) in [(42.7, 42u8), (300.0, 255), (-3.0, 0)] {
            let data = Array3::from_elem((3, 3, 3), value);
            let out = minmax().normalize(&image(data.clone())).unwrap();
            assert!(out.data.iter().all(|&v| v == expected), "value {}", value);

            let stretch = IntensityNormalizer::new(NormalizationPolicy::PercentileStretch { percentile: 1.0 });
            let out = stretch.normalize(&image(data)).unwrap();
            assert!(out.data.iter().all(|&v| v == expected));
        }
    }

    #[test]
    fn test_non_finite_values() {
        let mut data = Array3::from_shape_fn((1, 4, 1), |(_, x, _)| x as f64 * 10.0);
        data[[0, 1, 0]] = f64::NAN;

        let out = minmax().normalize(&image(data)).unwrap();
        assert_eq!(out.data.iter().copied().collect::<Vec<u8>>(), vec![0, 0, 170, 255]);
        assert_eq!(out.warnings, vec![ConversionWarning::NonFiniteValues { count: 1 }]);

        let all_nan = Array3::from_elem((2, 2, 1), f64::NAN);
        assert!(matches!(minmax().normalize(&image(all_nan)), Err(ConvertError::DegenerateRange(_))));
    }
}
