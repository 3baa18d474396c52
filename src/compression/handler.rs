//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for decoding the different TIFF compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompresses one strip or tile
    ///
    /// `expected_size` is the decoded size implied by the image layout;
    /// handlers use it to size buffers and to stop early on padded input.
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
