//! Image File Directory (IFD) structures
//!
//! An IFD is the tag table describing one image in a TIFF file. Each entry
//! carries its value inline when it fits in the entry's value field, and an
//! offset to the value array otherwise.

use std::collections::HashMap;
use std::fmt;
use log::trace;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::utils::tag_utils;

/// One image directory of a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    tag_map: HashMap<u16, IFDEntry>,
}

/// A single tag entry of an IFD
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// First value when stored inline, otherwise the offset to the values
    pub value_offset: u64,
    /// Raw bytes of the value field (4 used for classic TIFF, 8 for BigTIFF)
    pub value_bytes: [u8; 8],
}

impl IFDEntry {
    /// Creates an entry from an already decoded value/offset
    ///
    /// The raw value field is synthesized in little-endian order, which is
    /// what in-memory fixtures use.
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        Self {
            tag,
            field_type,
            count,
            value_offset,
            value_bytes: value_offset.to_le_bytes(),
        }
    }

    /// Creates an entry from the raw value field read out of the file
    ///
    /// Inline values are decoded with the file's byte order so that a SHORT
    /// stored in a big-endian file yields the right number.
    pub fn from_raw(
        tag: u16,
        field_type: u16,
        count: u64,
        raw: &[u8],
        byte_order: ByteOrder,
        is_big_tiff: bool,
    ) -> Self {
        let mut value_bytes = [0u8; 8];
        let field_len = raw.len().min(8);
        value_bytes[..field_len].copy_from_slice(&raw[..field_len]);

        let mut entry = Self {
            tag,
            field_type,
            count,
            value_offset: 0,
            value_bytes,
        };

        entry.value_offset = if entry.is_value_inline(is_big_tiff) {
            let size = entry.get_field_type_size().min(8);
            byte_order.word_from_bytes(&value_bytes[..size])
        } else {
            byte_order.word_from_bytes(&value_bytes[..field_len])
        };

        entry
    }

    /// Size in bytes of a single value of this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            _ => 1,
        }
    }

    /// Whether the values fit in the entry's own value field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let total_size = self.get_field_type_size() as u64 * self.count;
        let inline_size = if is_big_tiff { 8 } else { 4 };
        total_size <= inline_size
    }

    /// Human-readable description, used by debug logging and reports
    pub fn description(&self) -> String {
        let tag_name = tag_utils::get_tag_name(self.tag);
        let field_type_name = tag_utils::get_field_type_name(self.field_type);

        let value_display = match self.tag {
            tags::COMPRESSION => format!("{} ({})",
                                         self.value_offset,
                                         tag_utils::get_compression_name(self.value_offset)),
            tags::PHOTOMETRIC_INTERPRETATION => format!("{} ({})",
                                                        self.value_offset,
                                                        tag_utils::get_photometric_name(self.value_offset)),
            _ => self.value_offset.to_string(),
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag, tag_name, self.field_type, field_type_name, self.count, value_display)
    }
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry and indexes it by tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description());

        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Gets the first value (or the offset) of a tag
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag)
    }

    /// Width and height of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Number of samples per pixel, i.e. the band count (default 1)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Whether the image data is organized in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }

        Ok(())
    }
}
