//! TIFF file reader implementation
//!
//! Parses the header and the IFD chain of classic TIFF and BigTIFF files,
//! using a byte-order strategy picked from the header marker.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::ifd_utils;
use crate::utils::tag_utils;

/// Hard stop for IFD chains; protects against offset loops
const MAX_IFDS: usize = 1024;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    byte_order: Option<ByteOrder>,
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    current_file: Option<PathBuf>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader {
            byte_order: None,
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Opens the file at `filepath` and parses its structure
    pub fn load(&mut self, filepath: &Path) -> TiffResult<TIFF> {
        info!("Loading TIFF file: {}", filepath.display());
        self.current_file = Some(filepath.to_path_buf());

        let file = File::open(filepath)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        self.read(&mut reader)
    }

    /// Parses a TIFF from any seekable source
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Walk the IFD chain
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = format_utils::detect_byte_order(reader)?;
        let handler = byte_order.create_handler();
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;

        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler.as_ref())?;
        debug!("First IFD offset: {}", first_ifd_offset);

        self.byte_order = Some(byte_order);
        self.byte_order_handler = Some(handler);
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("No IFDs found in TIFF file".to_string()));
        }

        info!("Read {} IFDs ({}, {})",
              tiff.ifds.len(),
              if is_big_tiff { "BigTIFF" } else { "TIFF" },
              byte_order.name());
        Ok(tiff)
    }

    /// Walks the IFD chain starting at `first_ifd_offset`
    ///
    /// A broken link after the first IFD ends the chain with a warning; the
    /// first IFD itself must parse.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader,
                      first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if !visited.insert(ifd_offset) {
                warn!("IFD offset {} already visited, stopping IFD chain", ifd_offset);
                break;
            }

            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok((ifd, next_offset)) => {
                    debug!("IFD #{} has {} entries, next IFD at {}", ifd.number, ifd.entry_count(), next_offset);
                    ifds.push(ifd);
                    ifd_offset = next_offset;
                },
                Err(e) if !ifds.is_empty() => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                },
                Err(e) => return Err(e),
            }
        }

        Ok(ifds)
    }

    /// Reads one IFD and the offset of the next one
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<(IFD, u64)> {
        let handler = self.handler()?;
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = ifd_utils::read_entry_count(reader, self.is_big_tiff, handler)?;
        if entry_count == 0 || entry_count > ifd_utils::MAX_IFD_ENTRIES {
            return Err(TiffError::GenericError(format!(
                "Implausible IFD entry count {} at offset {}", entry_count, offset)));
        }

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        // The next-IFD offset follows the last entry directly
        let next_offset = ifd_utils::read_ifd_offset(reader, self.is_big_tiff, handler)?;

        Ok((ifd, next_offset))
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;
        let byte_order = self.byte_order()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut raw = [0u8; 8];
        let field_size = ifd_utils::value_field_size(self.is_big_tiff);
        reader.read_exact(&mut raw[..field_size])?;

        Ok(IFDEntry::from_raw(tag, field_type, count, &raw[..field_size], byte_order, self.is_big_tiff))
    }

    /// Reads all values of a tag as u64
    ///
    /// Inline values are decoded from the entry itself; other values are
    /// read from their offset in `reader`.
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;
        let handler = self.handler()?;

        let mut values = Vec::with_capacity(entry.count.min(1 << 20) as usize);

        if entry.is_value_inline(self.is_big_tiff) {
            let mut inline = Cursor::new(entry.value_bytes.to_vec());
            tag_utils::read_tag_value_array(&mut inline, entry, handler, &mut values)?;
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            tag_utils::read_tag_value_array(reader, entry, handler, &mut values)?;
        }

        Ok(values)
    }

    /// Byte order of the last parsed file
    pub fn byte_order(&self) -> TiffResult<ByteOrder> {
        self.byte_order
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    pub fn get_file_path(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }
}
