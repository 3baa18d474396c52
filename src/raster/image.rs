//! Channel-last raster image

use std::fmt;
use ndarray::{Array3, ArrayView2, Axis};

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::tiff::constants::sample_format;

/// Native sample encoding of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    UInt8,
    UInt16,
    UInt32,
    Int8,
    Int16,
    Int32,
    Float32,
    Float64,
}

impl SampleType {
    /// Maps a SampleFormat / BitsPerSample pair to a supported type
    pub fn from_tiff(format: u16, bits: u16) -> Option<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Some(SampleType::UInt8),
            (sample_format::UNSIGNED, 16) => Some(SampleType::UInt16),
            (sample_format::UNSIGNED, 32) => Some(SampleType::UInt32),
            (sample_format::SIGNED, 8) => Some(SampleType::Int8),
            (sample_format::SIGNED, 16) => Some(SampleType::Int16),
            (sample_format::SIGNED, 32) => Some(SampleType::Int32),
            (sample_format::IEEEFP, 32) => Some(SampleType::Float32),
            (sample_format::IEEEFP, 64) => Some(SampleType::Float64),
            _ => None,
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            SampleType::UInt8 | SampleType::Int8 => 8,
            SampleType::UInt16 | SampleType::Int16 => 16,
            SampleType::UInt32 | SampleType::Int32 | SampleType::Float32 => 32,
            SampleType::Float64 => 64,
        }
    }

    pub fn bytes(&self) -> usize {
        self.bits() as usize / 8
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// Converts a raw sample word (already in native byte order) to f64
    pub fn word_to_f64(&self, word: u64) -> f64 {
        match self {
            SampleType::UInt8 | SampleType::UInt16 | SampleType::UInt32 => word as f64,
            SampleType::Int8 => word as u8 as i8 as f64,
            SampleType::Int16 => word as u16 as i16 as f64,
            SampleType::Int32 => word as u32 as i32 as f64,
            SampleType::Float32 => f32::from_bits(word as u32) as f64,
            SampleType::Float64 => f64::from_bits(word),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::UInt8 => "uint8",
            SampleType::UInt16 => "uint16",
            SampleType::UInt32 => "uint32",
            SampleType::Int8 => "int8",
            SampleType::Int16 => "int16",
            SampleType::Int32 => "int32",
            SampleType::Float32 => "float32",
            SampleType::Float64 => "float64",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A height x width x channel raster
///
/// Samples are held as f64 whatever the source encoding; `sample_type`
/// remembers the native type.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    data: Array3<f64>,
    sample_type: SampleType,
}

impl RasterImage {
    /// Wraps an (H, W, C) array, rejecting empty dimensions
    pub fn new(data: Array3<f64>, sample_type: SampleType) -> ConvertResult<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 || channels == 0 {
            return Err(ConvertError::Shape(format!(
                "raster must have non-empty dimensions, got {}x{}x{}",
                height, width, channels
            )));
        }

        Ok(RasterImage { data, sample_type })
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn pixel_count(&self) -> usize {
        self.height() * self.width()
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array3<f64> {
        self.data
    }

    /// A single channel as a (H, W) view
    pub fn channel(&self, index: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(2), index)
    }

    /// A new raster holding `indices` in the given order
    pub fn select_channels(&self, indices: &[usize]) -> ConvertResult<RasterImage> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.channels()) {
            return Err(ConvertError::Shape(format!(
                "channel {} out of range for {} channels",
                bad,
                self.channels()
            )));
        }

        RasterImage::new(self.data.select(Axis(2), indices), self.sample_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_dimensions() {
        let data = Array3::<f64>::zeros((0, 4, 3));
        assert!(matches!(
            RasterImage::new(data, SampleType::UInt8),
            Err(ConvertError::Shape(_))
        ));
    }

    #[test]
    fn test_select_channels_reorders() {
        let data = Array3::from_shape_fn((2, 2, 3), |(_, _, c)| c as f64);
        let image = RasterImage::new(data, SampleType::UInt16).unwrap();

        let selected = image.select_channels(&[2, 0]).unwrap();
        assert_eq!(selected.channels(), 2);
        assert_eq!(selected.data()[[1, 1, 0]], 2.0);
        assert_eq!(selected.data()[[1, 1, 1]], 0.0);
        assert!(image.select_channels(&[3]).is_err());
    }

    #[test]
    fn test_signed_and_float_words() {
        assert_eq!(SampleType::Int16.word_to_f64(0xFFFE), -2.0);
        assert_eq!(SampleType::Float32.word_to_f64(1.5f32.to_bits() as u64), 1.5);
        assert_eq!(SampleType::from_tiff(1, 12), None);
    }
}
