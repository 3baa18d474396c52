//! Core TIFF data structures

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{new_subfile_type, tags};
use crate::tiff::ifd::IFD;

/// A parsed TIFF file: its directories and header properties
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in chain order
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF file
    pub is_big_tiff: bool,
    /// Byte order declared in the header
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The full-resolution image directory
    ///
    /// Returns the first IFD that is not flagged as a reduced-resolution
    /// overview, falling back to the first IFD.
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds
            .iter()
            .find(|ifd| !Self::is_overview(ifd))
            .or_else(|| self.ifds.first())
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Reduced-resolution subfiles (overviews)
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter().filter(|ifd| Self::is_overview(ifd)).collect()
    }

    fn is_overview(ifd: &IFD) -> bool {
        ifd.get_tag_value(tags::NEW_SUBFILE_TYPE)
            .map(|subfile| subfile & new_subfile_type::REDUCED_RESOLUTION != 0)
            .unwrap_or(false)
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;

        if let Some(ifd) = self.main_ifd() {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
