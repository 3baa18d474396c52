//! Byte order handling for TIFF files
//!
//! TIFF files declare their byte order in the first two bytes of the header.
//! Header and IFD parsing goes through a `ByteOrderHandler` strategy, while
//! bulk sample decoding uses the cheaper `ByteOrder::word_from_bytes`.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

/// Byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header marker
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian),
            0x4D4D => Ok(ByteOrder::BigEndian),
            _ => Err(TiffError::InvalidByteOrder(marker)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the reading strategy for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Assembles an unsigned word from up to 8 bytes in this byte order
    ///
    /// Used for raw sample words, where going through a reader per sample
    /// would dominate decode time.
    pub fn word_from_bytes(&self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64),
            ByteOrder::BigEndian => bytes
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64),
        }
    }
}

/// Strategy for reading multi-byte values in a given byte order
pub trait ByteOrderHandler: Send + Sync {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }
}
