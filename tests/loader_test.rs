//! Decoding of the supported on-disk layouts and codecs

mod common;

use common::{FixtureCompression, RasterFixture, SampleKind};
use tif2image::loader::{BandLoader, Chunking, PlanarConfig};
use tif2image::raster::ChannelSelection;
use tif2image::{ConversionWarning, ConvertError, SampleType};

fn gradient(width: usize, height: usize, bands: usize, sample: SampleKind) -> RasterFixture {
    RasterFixture::from_fn(width, height, bands, sample, |y, x, b| (b * 100 + y * width + x) as f64)
}

/// Loads every band and compares it with the fixture values
fn assert_round_trip(fixture: &RasterFixture) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raster.tif");
    fixture.write(&path);

    let loaded = BandLoader::load(&path, &ChannelSelection::All).unwrap();
    let data = loaded.image.data();
    assert_eq!(data.dim(), (fixture.height, fixture.width, fixture.bands));
    for y in 0..fixture.height {
        for x in 0..fixture.width {
            for b in 0..fixture.bands {
                assert_eq!(data[[y, x, b]], fixture.value(y, x, b), "pixel ({}, {}) band {}", y, x, b);
            }
        }
    }
}

#[test]
fn test_single_strip_chunky() {
    assert_round_trip(&gradient(6, 4, 3, SampleKind::U8));
}

#[test]
fn test_multiple_strips_with_short_last_strip() {
    assert_round_trip(&gradient(5, 7, 4, SampleKind::U16).strips(3));
}

#[test]
fn test_tiles_with_edge_padding() {
    assert_round_trip(&gradient(5, 3, 3, SampleKind::U16).tiles(4, 2));
}

#[test]
fn test_planar_strips() {
    assert_round_trip(&gradient(4, 4, 5, SampleKind::U16).planar().strips(2));
}

#[test]
fn test_planar_tiles_deflate() {
    assert_round_trip(
        &gradient(6, 5, 3, SampleKind::U8)
            .planar()
            .tiles(4, 4)
            .compression(FixtureCompression::Deflate),
    );
}

#[test]
fn test_deflate_with_horizontal_predictor() {
    assert_round_trip(
        &gradient(7, 3, 3, SampleKind::U16)
            .strips(2)
            .compression(FixtureCompression::Deflate)
            .with_predictor(),
    );
}

#[test]
fn test_lzw_strips() {
    assert_round_trip(&gradient(4, 4, 3, SampleKind::U8).strips(2).compression(FixtureCompression::Lzw));
}

#[test]
fn test_lzw_with_predictor() {
    assert_round_trip(
        &gradient(5, 2, 2, SampleKind::U8)
            .strips(1)
            .compression(FixtureCompression::Lzw)
            .with_predictor(),
    );
}

#[test]
fn test_float_samples() {
    let fixture = RasterFixture::from_fn(3, 2, 2, SampleKind::F32, |y, x, b| {
        (y as f64 - 1.0) * 0.25 + x as f64 * 1.5 - b as f64
    });
    assert_round_trip(&fixture);
}

#[test]
fn test_layout_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiled.tif");
    gradient(8, 8, 4, SampleKind::U16).planar().tiles(4, 4).write(&path);

    let (tiff, layout) = BandLoader::inspect(&path).unwrap();
    assert_eq!(tiff.ifd_count(), 1);
    assert_eq!((layout.width, layout.height, layout.samples_per_pixel), (8, 8, 4));
    assert_eq!(layout.sample_type, SampleType::UInt16);
    assert_eq!(layout.planar, PlanarConfig::Planar);
    assert_eq!(layout.chunking, Chunking::Tiles { tile_width: 4, tile_height: 4 });
    assert_eq!(layout.expected_chunk_count(), 16);
}

#[test]
fn test_selected_bands_in_requested_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bands.tif");
    let fixture = gradient(3, 3, 5, SampleKind::U16).planar();
    fixture.write(&path);

    let loaded = BandLoader::load(&path, &ChannelSelection::Indices(vec![4, 0, 2])).unwrap();
    assert_eq!(loaded.bands, vec![4, 0, 2]);
    assert_eq!(loaded.source_bands, 5);
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.image.data()[[1, 2, 0]], fixture.value(1, 2, 4));
    assert_eq!(loaded.image.data()[[1, 2, 1]], fixture.value(1, 2, 0));
    assert_eq!(loaded.image.data()[[1, 2, 2]], fixture.value(1, 2, 2));
}

#[test]
fn test_out_of_range_selection_falls_back_to_all_bands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.tif");
    gradient(2, 2, 2, SampleKind::U8).write(&path);

    let loaded = BandLoader::load(&path, &ChannelSelection::default()).unwrap();
    assert_eq!(loaded.bands, vec![0, 1]);
    assert_eq!(loaded.image.channels(), 2);
    assert_eq!(
        loaded.warnings,
        vec![ConversionWarning::BandFallback { requested: vec![0, 1, 2], available: 2 }]
    );
}

#[test]
fn test_truncated_file_is_source_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.tif");
    let bytes = gradient(8, 8, 3, SampleKind::U16).to_bytes();
    // keep the header only; the IFD offset now points past the end
    std::fs::write(&path, &bytes[..16]).unwrap();

    let err = BandLoader::load(&path, &ChannelSelection::All).unwrap_err();
    assert!(matches!(err, ConvertError::SourceRead { .. }));
}

#[test]
fn test_missing_file_is_source_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BandLoader::load(&dir.path().join("absent.tif"), &ChannelSelection::All).unwrap_err();
    match err {
        ConvertError::SourceRead { path, .. } => assert!(path.ends_with("absent.tif")),
        other => panic!("unexpected error: {}", other),
    }
}

/// Little-endian header whose single IFD declares `width` x `height` x 3 bytes
fn oversized_header(width: u32, height: u32) -> Vec<u8> {
    let entries: [(u16, u16, u32); 7] = [
        (256, 4, width),
        (257, 4, height),
        (258, 3, 8),
        (273, 4, 8),
        (277, 3, 3),
        (279, 4, 0),
        (284, 3, 1),
    ];

    let mut bytes = b"II".to_vec();
    bytes.extend_from_slice(&42u16.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, field_type, value) in entries {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&field_type.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        if field_type == 3 {
            bytes.extend_from_slice(&(value as u16).to_le_bytes());
            bytes.extend_from_slice(&[0, 0]);
        } else {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

#[test]
fn test_huge_declared_dimensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.tif");
    std::fs::write(&path, oversized_header(u32::MAX, u32::MAX)).unwrap();

    let err = BandLoader::load(&path, &ChannelSelection::All).unwrap_err();
    match err {
        ConvertError::SourceRead { reason, .. } => assert!(reason.contains("too large"), "{}", reason),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_dimensions_beyond_file_size_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.tif");
    // fits in memory arithmetic but not in a 100-byte file
    std::fs::write(&path, oversized_header(100_000, 100_000)).unwrap();

    let err = BandLoader::load(&path, &ChannelSelection::Indices(vec![0])).unwrap_err();
    assert!(matches!(err, ConvertError::SourceRead { .. }));
}
