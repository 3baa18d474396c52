//! Handler for TIFF LZW compressed data
//!
//! TIFF LZW packs codes most-significant bit first and widens the code
//! one entry early (at 511, 1023 and 2047 table entries).

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

const CLEAR_CODE: u16 = 256;
const EOI_CODE: u16 = 257;
const FIRST_CODE: u16 = 258;
const MAX_CODE_SIZE: u32 = 12;
const TABLE_CAPACITY: usize = 1 << MAX_CODE_SIZE;

/// LZW handler (compression code 5)
pub struct LzwHandler;

/// Reads variable-width codes MSB-first
struct CodeReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> CodeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        CodeReader { data, bit_pos: 0 }
    }

    fn read(&mut self, width: u32) -> Option<u16> {
        if self.bit_pos + width as usize > self.data.len() * 8 {
            return None;
        }

        let mut code = 0u16;
        for _ in 0..width {
            let byte = self.data[self.bit_pos / 8];
            let bit = (byte >> (7 - (self.bit_pos % 8))) & 1;
            code = (code << 1) | bit as u16;
            self.bit_pos += 1;
        }
        Some(code)
    }
}

/// String table stored as (prefix code, last byte) pairs
struct StringTable {
    prefix: Vec<u16>,
    suffix: Vec<u8>,
    first: Vec<u8>,
    scratch: Vec<u8>,
}

impl StringTable {
    fn new() -> Self {
        let mut table = StringTable {
            prefix: Vec::with_capacity(TABLE_CAPACITY),
            suffix: Vec::with_capacity(TABLE_CAPACITY),
            first: Vec::with_capacity(TABLE_CAPACITY),
            scratch: Vec::new(),
        };
        table.reset();
        table
    }

    fn reset(&mut self) {
        self.prefix.clear();
        self.suffix.clear();
        self.first.clear();
        for byte in 0..=255u8 {
            self.prefix.push(u16::MAX);
            self.suffix.push(byte);
            self.first.push(byte);
        }
        // clear and end-of-information occupy 256 and 257
        for _ in 0..2 {
            self.prefix.push(u16::MAX);
            self.suffix.push(0);
            self.first.push(0);
        }
    }

    fn len(&self) -> usize {
        self.prefix.len()
    }

    fn add(&mut self, prefix: u16, byte: u8) {
        if self.len() < TABLE_CAPACITY {
            let first = self.first[prefix as usize];
            self.prefix.push(prefix);
            self.suffix.push(byte);
            self.first.push(first);
        }
    }

    /// Appends the string for `code` to `output`
    fn emit(&mut self, code: u16, output: &mut Vec<u8>) {
        self.scratch.clear();
        let mut current = code;
        while current != u16::MAX {
            self.scratch.push(self.suffix[current as usize]);
            current = self.prefix[current as usize];
        }
        output.extend(self.scratch.iter().rev());
    }

    fn code_width(&self) -> u32 {
        // early change: widen when the next free code would no longer fit
        match self.len() + 1 {
            n if n >= 2048 => 12,
            n if n >= 1024 => 11,
            n if n >= 512 => 10,
            _ => 9,
        }
    }
}

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], expected_size: usize) -> TiffResult<Vec<u8>> {
        let mut output = Vec::with_capacity(expected_size);
        let mut table = StringTable::new();
        let mut reader = CodeReader::new(data);
        let mut previous: Option<u16> = None;

        while let Some(code) = reader.read(table.code_width()) {
            if code == EOI_CODE {
                break;
            }

            if code == CLEAR_CODE {
                table.reset();
                previous = None;
                continue;
            }

            match previous {
                None => {
                    if code >= FIRST_CODE {
                        return Err(TiffError::DecompressionError(
                            format!("LZW: code {} before any table entry", code)));
                    }
                    table.emit(code, &mut output);
                },
                Some(prev) => {
                    let code_index = code as usize;
                    if code_index < table.len() {
                        table.emit(code, &mut output);
                        let first = table.first[code_index];
                        table.add(prev, first);
                    } else if code_index == table.len() {
                        // KwKwK case: the string is prev + first byte of prev
                        let first = table.first[prev as usize];
                        table.add(prev, first);
                        table.emit(code, &mut output);
                    } else {
                        return Err(TiffError::DecompressionError(
                            format!("LZW: code {} out of range", code)));
                    }
                },
            }

            previous = Some(code);

            if output.len() >= expected_size {
                break;
            }
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        5
    }
}
