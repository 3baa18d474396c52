//! Minimal little-endian TIFF writer for multi-band test rasters

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleKind {
    U8,
    U16,
    F32,
}

impl SampleKind {
    fn bits(self) -> u16 {
        match self {
            SampleKind::U8 => 8,
            SampleKind::U16 => 16,
            SampleKind::F32 => 32,
        }
    }

    fn format(self) -> u16 {
        match self {
            SampleKind::F32 => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkLayout {
    Strips { rows_per_strip: usize },
    Tiles { width: usize, height: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureCompression {
    None,
    Deflate,
    /// Only for chunks short enough to keep 9-bit codes
    Lzw,
}

/// A raster to be written as TIFF; values are indexed `(y * width + x) * bands + band`
#[derive(Debug, Clone)]
pub struct RasterFixture {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    pub sample: SampleKind,
    pub planar: bool,
    pub layout: ChunkLayout,
    pub compression: FixtureCompression,
    pub horizontal_predictor: bool,
    values: Vec<f64>,
}

impl RasterFixture {
    pub fn from_fn(width: usize, height: usize, bands: usize, sample: SampleKind,
                   f: impl Fn(usize, usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(width * height * bands);
        for y in 0..height {
            for x in 0..width {
                for b in 0..bands {
                    values.push(f(y, x, b));
                }
            }
        }

        RasterFixture {
            width,
            height,
            bands,
            sample,
            planar: false,
            layout: ChunkLayout::Strips { rows_per_strip: height },
            compression: FixtureCompression::None,
            horizontal_predictor: false,
            values,
        }
    }

    /// Every pixel of band `b` holds `band_values[b]`
    pub fn constant_bands(width: usize, height: usize, sample: SampleKind, band_values: &[f64]) -> Self {
        let band_values = band_values.to_vec();
        Self::from_fn(width, height, band_values.len(), sample, move |_, _, b| band_values[b])
    }

    pub fn planar(mut self) -> Self {
        self.planar = true;
        self
    }

    pub fn strips(mut self, rows_per_strip: usize) -> Self {
        self.layout = ChunkLayout::Strips { rows_per_strip };
        self
    }

    pub fn tiles(mut self, width: usize, height: usize) -> Self {
        self.layout = ChunkLayout::Tiles { width, height };
        self
    }

    pub fn compression(mut self, compression: FixtureCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_predictor(mut self) -> Self {
        self.horizontal_predictor = true;
        self
    }

    pub fn value(&self, y: usize, x: usize, band: usize) -> f64 {
        self.values[(y * self.width + x) * self.bands + band]
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let chunks = self.encode_chunks();

        let mut buffer = Vec::new();
        buffer.write_u16::<LittleEndian>(0x4949).unwrap();
        buffer.write_u16::<LittleEndian>(42).unwrap();
        buffer.write_u32::<LittleEndian>(0).unwrap(); // patched below

        let mut offsets = Vec::new();
        let mut byte_counts = Vec::new();
        for chunk in &chunks {
            offsets.push(buffer.len() as u32);
            byte_counts.push(chunk.len() as u32);
            buffer.extend_from_slice(chunk);
            if buffer.len() % 2 == 1 {
                buffer.push(0);
            }
        }

        let spp = self.bands as u16;
        let (offsets_tag, counts_tag) = match self.layout {
            ChunkLayout::Strips { .. } => (273u16, 279u16),
            ChunkLayout::Tiles { .. } => (324u16, 325u16),
        };

        let mut entries: Vec<Entry> = vec![
            Entry::long(256, &[self.width as u32]),
            Entry::long(257, &[self.height as u32]),
            Entry::short(258, &vec![self.sample.bits(); self.bands]),
            Entry::short(259, &[self.compression_code()]),
            Entry::short(262, &[if self.bands >= 3 { 2 } else { 1 }]),
            Entry::long(offsets_tag, &offsets),
            Entry::short(277, &[spp]),
            Entry::long(counts_tag, &byte_counts),
            Entry::short(284, &[if self.planar { 2 } else { 1 }]),
            Entry::short(339, &vec![self.sample.format(); self.bands]),
        ];
        match self.layout {
            ChunkLayout::Strips { rows_per_strip } => {
                entries.push(Entry::long(278, &[rows_per_strip as u32]));
            },
            ChunkLayout::Tiles { width, height } => {
                entries.push(Entry::long(322, &[width as u32]));
                entries.push(Entry::long(323, &[height as u32]));
            },
        }
        if self.horizontal_predictor {
            entries.push(Entry::short(317, &[2]));
        }
        entries.sort_by_key(|e| e.tag);

        // out-of-line values first, then the IFD
        let mut value_offsets = Vec::new();
        for entry in &entries {
            if entry.data.len() > 4 {
                value_offsets.push(Some(buffer.len() as u32));
                buffer.extend_from_slice(&entry.data);
            } else {
                value_offsets.push(None);
            }
        }

        let ifd_offset = buffer.len() as u32;
        buffer[4..8].copy_from_slice(&ifd_offset.to_le_bytes());

        buffer.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
        for (entry, offset) in entries.iter().zip(value_offsets) {
            buffer.write_u16::<LittleEndian>(entry.tag).unwrap();
            buffer.write_u16::<LittleEndian>(entry.field_type).unwrap();
            buffer.write_u32::<LittleEndian>(entry.count).unwrap();
            match offset {
                Some(offset) => buffer.write_u32::<LittleEndian>(offset).unwrap(),
                None => {
                    let mut inline = entry.data.clone();
                    inline.resize(4, 0);
                    buffer.extend_from_slice(&inline);
                },
            }
        }
        buffer.write_u32::<LittleEndian>(0).unwrap();

        buffer
    }

    fn compression_code(&self) -> u16 {
        match self.compression {
            FixtureCompression::None => 1,
            FixtureCompression::Lzw => 5,
            FixtureCompression::Deflate => 8,
        }
    }

    fn encode_chunks(&self) -> Vec<Vec<u8>> {
        let planes = if self.planar { self.bands } else { 1 };
        let spp = if self.planar { 1 } else { self.bands };

        let mut chunks = Vec::new();
        for plane in 0..planes {
            for (x0, y0, chunk_width, chunk_rows) in self.chunk_regions() {
                let mut rows = Vec::with_capacity(chunk_rows);
                for y in y0..y0 + chunk_rows {
                    let mut row = Vec::with_capacity(chunk_width * spp);
                    for x in x0..x0 + chunk_width {
                        for s in 0..spp {
                            let band = if self.planar { plane } else { s };
                            let inside = x < self.width && y < self.height;
                            row.push(if inside { self.value(y, x, band) } else { 0.0 });
                        }
                    }
                    rows.push(row);
                }
                chunks.push(self.compress(&self.encode_rows(rows, spp)));
            }
        }
        chunks
    }

    /// (x, y, stored width, stored rows) per chunk in file order
    fn chunk_regions(&self) -> Vec<(usize, usize, usize, usize)> {
        match self.layout {
            ChunkLayout::Strips { rows_per_strip } => (0..self.height)
                .step_by(rows_per_strip)
                .map(|y| (0, y, self.width, rows_per_strip.min(self.height - y)))
                .collect(),
            ChunkLayout::Tiles { width, height } => {
                let mut regions = Vec::new();
                for y in (0..self.height).step_by(height) {
                    for x in (0..self.width).step_by(width) {
                        regions.push((x, y, width, height));
                    }
                }
                regions
            },
        }
    }

    fn encode_rows(&self, rows: Vec<Vec<f64>>, spp: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        for row in rows {
            match self.sample {
                SampleKind::F32 => {
                    for v in row {
                        bytes.write_f32::<LittleEndian>(v as f32).unwrap();
                    }
                },
                SampleKind::U8 | SampleKind::U16 => {
                    let mut words: Vec<u64> = row.iter().map(|&v| v as u64).collect();
                    if self.horizontal_predictor {
                        let mask = (1u64 << self.sample.bits()) - 1;
                        for i in (spp..words.len()).rev() {
                            words[i] = words[i].wrapping_sub(words[i - spp]) & mask;
                        }
                    }
                    for w in words {
                        match self.sample {
                            SampleKind::U8 => bytes.push(w as u8),
                            _ => bytes.write_u16::<LittleEndian>(w as u16).unwrap(),
                        }
                    }
                },
            }
        }
        bytes
    }

    fn compress(&self, raw: &[u8]) -> Vec<u8> {
        match self.compression {
            FixtureCompression::None => raw.to_vec(),
            FixtureCompression::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(raw).unwrap();
                encoder.finish().unwrap()
            },
            FixtureCompression::Lzw => lzw_encode(raw),
        }
    }
}

struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn short(tag: u16, values: &[u16]) -> Self {
        let mut data = Vec::new();
        for &v in values {
            data.write_u16::<LittleEndian>(v).unwrap();
        }
        Entry { tag, field_type: 3, count: values.len() as u32, data }
    }

    fn long(tag: u16, values: &[u32]) -> Self {
        let mut data = Vec::new();
        for &v in values {
            data.write_u32::<LittleEndian>(v).unwrap();
        }
        Entry { tag, field_type: 4, count: values.len() as u32, data }
    }
}

/// TIFF LZW with fixed 9-bit codes, MSB-first
fn lzw_encode(data: &[u8]) -> Vec<u8> {
    assert!(data.len() < 200, "fixture LZW encoder only supports 9-bit codes");

    let mut bits = BitWriter::default();
    bits.write(256, 9);

    let mut table: HashMap<(u16, u8), u16> = HashMap::new();
    let mut next = 258u16;
    let mut current: Option<u16> = None;
    for &byte in data {
        current = match current {
            None => Some(byte as u16),
            Some(prefix) => match table.get(&(prefix, byte)) {
                Some(&code) => Some(code),
                None => {
                    bits.write(prefix, 9);
                    table.insert((prefix, byte), next);
                    next += 1;
                    Some(byte as u16)
                },
            },
        };
    }
    if let Some(code) = current {
        bits.write(code, 9);
    }
    bits.write(257, 9);
    bits.finish()
}

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    count: u32,
}

impl BitWriter {
    fn write(&mut self, code: u16, width: u32) {
        self.acc = (self.acc << width) | code as u32;
        self.count += width;
        while self.count >= 8 {
            self.count -= 8;
            self.bytes.push((self.acc >> self.count) as u8);
            self.acc &= (1 << self.count) - 1;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.count > 0 {
            self.bytes.push((self.acc << (8 - self.count)) as u8);
        }
        self.bytes
    }
}
