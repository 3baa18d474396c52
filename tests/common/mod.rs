//! Shared helpers for the integration tests

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::{ChunkLayout, FixtureCompression, RasterFixture, SampleKind};

/// Reads back an 8-bit image written by the converter
pub fn read_output(path: &std::path::Path) -> image::DynamicImage {
    image::open(path).unwrap()
}
