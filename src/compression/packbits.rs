//! Handler for PackBits run-length encoded data

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// PackBits handler (compression code 32773)
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        let mut output = Vec::with_capacity(expected_size);
        let mut i = 0;

        while i < data.len() && output.len() < expected_size {
            let header = data[i] as i8;
            i += 1;

            if header >= 0 {
                // literal run of header + 1 bytes
                let count = header as usize + 1;
                let literal = data.get(i..i + count).ok_or_else(|| {
                    TiffError::DecompressionError("PackBits: unexpected end of data".to_string())
                })?;
                output.extend_from_slice(literal);
                i += count;
            } else if header != -128 {
                // next byte repeated 1 - header times
                let count = 1 - header as isize;
                let value = *data.get(i).ok_or_else(|| {
                    TiffError::DecompressionError("PackBits: unexpected end of data".to_string())
                })?;
                i += 1;
                output.resize(output.len() + count as usize, value);
            }
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u64 {
        32773
    }
}
