//! IFD utilities
//!
//! Offset and entry-count reads whose width depends on classic vs BigTIFF.

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::TiffResult;

/// Upper bound on entries per IFD; real files stay far below it
pub const MAX_IFD_ENTRIES: u64 = 4096;

/// Reads an IFD offset (the header's first offset or an IFD's next offset)
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    if is_big_tiff {
        Ok(byte_order_handler.read_u64(reader)?)
    } else {
        Ok(byte_order_handler.read_u32(reader)? as u64)
    }
}

/// Reads the number of entries at the start of an IFD
pub fn read_entry_count(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    if is_big_tiff {
        Ok(byte_order_handler.read_u64(reader)?)
    } else {
        Ok(byte_order_handler.read_u16(reader)? as u64)
    }
}

/// Size in bytes of an entry's value/offset field
pub fn value_field_size(is_big_tiff: bool) -> usize {
    if is_big_tiff { 8 } else { 4 }
}
