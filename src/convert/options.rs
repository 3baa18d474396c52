//! Conversion options and their TOML representation

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::normalize::{NormalizationPolicy, DEFAULT_STRETCH_PERCENTILE};
use crate::raster::ChannelSelection;
use crate::reducer::{ChannelOrderCorrection, ReducerOptions};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

const KNOWN_KEYS: [&str; 7] = [
    "bands",
    "bit_depth",
    "stretch",
    "percentile",
    "channel_order",
    "remove_alpha_at_zero",
    "jpeg_quality",
];

/// Every parameter of a single conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub channel_selection: ChannelSelection,
    /// Fixed divisor (e.g. 4096 for 12-bit data); `None` means min-max
    pub bit_depth_divisor: Option<f64>,
    pub use_stretch: bool,
    pub stretch_percentile: f64,
    pub channel_order: ChannelOrderCorrection,
    pub remove_alpha_at_index_zero: bool,
    pub jpeg_quality: u8,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            channel_selection: ChannelSelection::default(),
            bit_depth_divisor: None,
            use_stretch: false,
            stretch_percentile: DEFAULT_STRETCH_PERCENTILE,
            channel_order: ChannelOrderCorrection::None,
            remove_alpha_at_index_zero: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ConversionOptions {
    /// Loads options from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> ConvertResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("Loading conversion options from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parses options from TOML text
    ///
    /// ```toml
    /// bands = [2, 1, 0]      # or "all"
    /// bit_depth = 4096
    /// stretch = true
    /// percentile = 2.0
    /// channel_order = "swap-rb"
    /// remove_alpha_at_zero = false
    /// jpeg_quality = 90
    /// ```
    pub fn from_toml_str(content: &str) -> ConvertResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(ConvertError::Config(format!("Failed to parse TOML: {}", e))),
        };

        let table = toml_value.as_table()
            .ok_or_else(|| ConvertError::Config("options must be a TOML table".to_string()))?;

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unknown option '{}'", key);
            }
        }

        let mut options = ConversionOptions::default();

        if let Some(value) = table.get("bands") {
            options.channel_selection = Self::parse_bands(value)?;
        }
        if let Some(value) = table.get("bit_depth") {
            options.bit_depth_divisor = Some(Self::number(value, "bit_depth")?);
        }
        if let Some(value) = table.get("stretch") {
            options.use_stretch = value.as_bool()
                .ok_or_else(|| Self::type_error("stretch", "a boolean"))?;
        }
        if let Some(value) = table.get("percentile") {
            options.stretch_percentile = Self::number(value, "percentile")?;
        }
        if let Some(value) = table.get("channel_order") {
            options.channel_order = value.as_str()
                .ok_or_else(|| Self::type_error("channel_order", "a string"))?
                .parse()?;
        }
        if let Some(value) = table.get("remove_alpha_at_zero") {
            options.remove_alpha_at_index_zero = value.as_bool()
                .ok_or_else(|| Self::type_error("remove_alpha_at_zero", "a boolean"))?;
        }
        if let Some(value) = table.get("jpeg_quality") {
            let quality = value.as_integer()
                .ok_or_else(|| Self::type_error("jpeg_quality", "an integer"))?;
            options.jpeg_quality = u8::try_from(quality)
                .map_err(|_| ConvertError::Config(format!("jpeg_quality {} out of range", quality)))?;
        }

        options.validate()?;
        Ok(options)
    }

    fn parse_bands(value: &toml::Value) -> ConvertResult<ChannelSelection> {
        if let Some(text) = value.as_str() {
            return text.parse();
        }

        let array = value.as_array()
            .ok_or_else(|| Self::type_error("bands", "an array of band indices or \"all\""))?;
        let indices = array
            .iter()
            .map(|v| {
                v.as_integer()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| Self::type_error("bands", "non-negative integers"))
            })
            .collect::<ConvertResult<Vec<usize>>>()?;

        let selection = ChannelSelection::Indices(indices);
        selection.validate()?;
        Ok(selection)
    }

    fn number(value: &toml::Value, key: &str) -> ConvertResult<f64> {
        value.as_float()
            .or_else(|| value.as_integer().map(|i| i as f64))
            .ok_or_else(|| Self::type_error(key, "a number"))
    }

    fn type_error(key: &str, expected: &str) -> ConvertError {
        ConvertError::Config(format!("option '{}' must be {}", key, expected))
    }

    /// Checks value ranges; run before any file is touched
    pub fn validate(&self) -> ConvertResult<()> {
        self.channel_selection.validate()?;
        self.normalization_policy()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConvertError::Config(format!(
                "jpeg quality must be in 1..=100, got {}", self.jpeg_quality)));
        }
        Ok(())
    }

    pub fn normalization_policy(&self) -> ConvertResult<NormalizationPolicy> {
        NormalizationPolicy::from_options(self.bit_depth_divisor, self.use_stretch, self.stretch_percentile)
    }

    pub fn reducer_options(&self) -> ReducerOptions {
        ReducerOptions {
            remove_alpha_at_index_zero: self.remove_alpha_at_index_zero,
            channel_order: self.channel_order,
        }
    }
}
