//! Seekable reader trait
//!
//! The TIFF parser jumps between the header, IFDs and strip/tile data, so every
//! source it reads from must support both reading and seeking.

use std::io::{Read, Seek};

/// Readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
