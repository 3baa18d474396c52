//! Normalization policy selection

use std::fmt;
use log::info;

use crate::convert::errors::{ConvertError, ConvertResult};

/// Default percentile clipped at each end by the stretch policy
pub const DEFAULT_STRETCH_PERCENTILE: f64 = 1.0;

/// How raw sample values are mapped to 8 bits
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationPolicy {
    /// Fixed divisor when given, otherwise global min-max
    MinMax { divisor: Option<f64> },
    /// Linear map of the [p, 100 - p] percentile range
    PercentileStretch { percentile: f64 },
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        NormalizationPolicy::MinMax { divisor: None }
    }
}

impl NormalizationPolicy {
    /// Builds the policy from the flat conversion options
    ///
    /// Stretch takes precedence; a divisor given alongside it is ignored.
    pub fn from_options(divisor: Option<f64>, use_stretch: bool, percentile: f64) -> ConvertResult<Self> {
        let policy = if use_stretch {
            if let Some(d) = divisor {
                info!("Percentile stretch requested; ignoring bit-depth divisor {}", d);
            }
            NormalizationPolicy::PercentileStretch { percentile }
        } else {
            NormalizationPolicy::MinMax { divisor }
        };

        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> ConvertResult<()> {
        match *self {
            NormalizationPolicy::MinMax { divisor: Some(d) } if !(d.is_finite() && d > 0.0) => {
                Err(ConvertError::Config(format!("bit-depth divisor must be positive, got {}", d)))
            },
            NormalizationPolicy::PercentileStretch { percentile } if !(0.0..50.0).contains(&percentile) => {
                Err(ConvertError::Config(format!(
                    "stretch percentile must be in [0, 50), got {}", percentile)))
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationPolicy::MinMax { divisor: Some(d) } => write!(f, "divide by {}", d),
            NormalizationPolicy::MinMax { divisor: None } => f.write_str("min-max"),
            NormalizationPolicy::PercentileStretch { percentile } => {
                write!(f, "{}% stretch", percentile)
            },
        }
    }
}
