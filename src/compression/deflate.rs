//! Handler for Adobe Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Adobe Deflate (Zlib) compression handler
///
/// Covers both the registered code 8 and the older 32946 value, which
/// carry the same zlib stream.
pub struct AdobeDeflateHandler {
    code: u16,
}

impl AdobeDeflateHandler {
    pub fn new() -> Self {
        AdobeDeflateHandler { code: compression::DEFLATE }
    }

    /// Handler registered under the pre-standard code 32946
    pub fn legacy() -> Self {
        AdobeDeflateHandler { code: compression::DEFLATE_LEGACY }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::with_capacity(expected_size);
        match decoder.read_to_end(&mut decompressed_data) {
            Ok(_) => Ok(decompressed_data),
            Err(e) => Err(TiffError::DecompressionError(format!("Deflate: {}", e))),
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        self.code as u64
    }
}
