//! Band selection

use std::fmt;
use std::str::FromStr;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::report::ConversionWarning;

/// Which source bands to load, and in which order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelection {
    /// Zero-based band indices
    Indices(Vec<usize>),
    /// Every band in file order
    All,
}

impl Default for ChannelSelection {
    fn default() -> Self {
        ChannelSelection::Indices(vec![0, 1, 2])
    }
}

impl ChannelSelection {
    pub fn validate(&self) -> ConvertResult<()> {
        match self {
            ChannelSelection::Indices(indices) if indices.is_empty() => {
                Err(ConvertError::Config("band selection must not be empty".to_string()))
            },
            _ => Ok(()),
        }
    }

    /// Resolves the selection against a source with `band_count` bands
    ///
    /// Falls back to every band in file order when the source has fewer than
    /// three bands or an index is out of range.
    pub fn resolve(&self, band_count: usize) -> (Vec<usize>, Option<ConversionWarning>) {
        let all: Vec<usize> = (0..band_count).collect();

        match self {
            ChannelSelection::All => (all, None),
            ChannelSelection::Indices(indices) => {
                let in_range = indices.iter().all(|&i| i < band_count);
                if band_count >= 3 && in_range {
                    (indices.clone(), None)
                } else if indices == &all {
                    (all, None)
                } else {
                    let warning = ConversionWarning::BandFallback {
                        requested: indices.clone(),
                        available: band_count,
                    };
                    (all, Some(warning))
                }
            },
        }
    }
}

impl FromStr for ChannelSelection {
    type Err = ConvertError;

    /// Parses `all` or a comma separated index list such as `2,1,0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(ChannelSelection::All);
        }

        let indices = trimmed
            .split(',')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|_| {
                    ConvertError::Config(format!("invalid band index '{}'", part.trim()))
                })
            })
            .collect::<ConvertResult<Vec<usize>>>()?;

        let selection = ChannelSelection::Indices(indices);
        selection.validate()?;
        Ok(selection)
    }
}

impl fmt::Display for ChannelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSelection::All => f.write_str("all"),
            ChannelSelection::Indices(indices) => {
                let parts: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                f.write_str(&parts.join(","))
            },
        }
    }
}
