//! I/O helpers for raster decoding
//!
//! Byte-order strategies and the seekable reader abstraction used by the
//! TIFF parser and the band decoders.

pub mod seekable;
pub mod byte_order;
