//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::lzw::LzwHandler;
use super::packbits::PackBitsHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        let Ok(code16) = u16::try_from(code) else {
            return Err(TiffError::UnsupportedCompression(code));
        };

        match code16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::LZW => Ok(Box::new(LzwHandler)),
            compression::DEFLATE => Ok(Box::new(AdobeDeflateHandler::new())),
            compression::DEFLATE_LEGACY => Ok(Box::new(AdobeDeflateHandler::legacy())),
            compression::ZSTD => Ok(Box::new(ZstdHandler)),
            compression::PACKBITS => Ok(Box::new(PackBitsHandler)),
            _ => Err(TiffError::UnsupportedCompression(code)),
        }
    }

    /// Whether a handler exists for the given compression code
    pub fn is_supported(code: u64) -> bool {
        Self::create_handler(code).is_ok()
    }
}
