//! Intensity Normalizer: arbitrary sample ranges to 8 bits

mod normalizer;
mod percentile;
mod policy;

pub use normalizer::{IntensityNormalizer, NormalizedImage, DEGENERATE_EPSILON};
pub use percentile::percentiles;
pub use policy::{NormalizationPolicy, DEFAULT_STRETCH_PERCENTILE};
