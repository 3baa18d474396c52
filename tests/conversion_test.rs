//! End-to-end conversions from TIFF fixtures to PNG/JPEG files

mod common;

use common::{read_output, RasterFixture, SampleKind};
use tif2image::raster::ChannelSelection;
use tif2image::reducer::ChannelOrderCorrection;
use tif2image::{convert_file, AlphaDetectionResult, ConversionOptions, ConversionWarning, ConvertError};

#[test]
fn test_multispectral_with_saturated_first_band() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("six.tif");
    let output = dir.path().join("six.png");
    RasterFixture::constant_bands(4, 4, SampleKind::U8, &[250.0, 10.0, 20.0, 30.0, 40.0, 50.0]).write(&input);

    let options = ConversionOptions {
        channel_selection: ChannelSelection::All,
        ..ConversionOptions::default()
    };
    let report = convert_file(&input, &output, &options).unwrap();

    assert_eq!(report.source_bands, 6);
    assert_eq!(report.loaded_channels, 6);
    assert_eq!(report.output_channels, 3);
    assert_eq!(report.alpha, AlphaDetectionResult::Channel(0));
    assert!(report.warnings.contains(&ConversionWarning::EmptyBandGroup { group: 2, band: 5 }));

    let rgb = read_output(&output).to_rgb8();
    assert_eq!(rgb.dimensions(), (4, 4));
    for pixel in rgb.pixels() {
        assert_eq!(pixel.0, [255, 0, 51]);
    }
}

#[test]
fn test_three_band_gradient_min_max() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gradient.tif");
    let output = dir.path().join("gradient.png");
    RasterFixture::from_fn(4, 4, 3, SampleKind::U16, |y, x, b| (b * 16 + y * 4 + x) as f64).write(&input);

    let report = convert_file(&input, &output, &ConversionOptions::default()).unwrap();
    assert_eq!(report.alpha, AlphaDetectionResult::None);
    assert!(report.warnings.is_empty());

    let rgb = read_output(&output).to_rgb8();
    for y in 0..4u32 {
        for x in 0..4u32 {
            let pixel = rgb.get_pixel(x, y);
            for b in 0..3u32 {
                let v = (b * 16 + y * 4 + x) as f64;
                let expected = (v / 47.0 * 255.0).round_ties_even() as u8;
                assert_eq!(pixel.0[b as usize], expected, "pixel ({}, {}) band {}", x, y, b);
            }
        }
    }
}

#[test]
fn test_two_bands_become_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pair.tif");
    let output = dir.path().join("pair.png");
    RasterFixture::from_fn(2, 1, 2, SampleKind::U8, |_, x, b| if x == 0 { 10.0 } else { 20.0 + b as f64 * 20.0 })
        .write(&input);

    let report = convert_file(&input, &output, &ConversionOptions::default()).unwrap();
    assert_eq!(report.output_channels, 1);
    assert!(report.warnings.contains(&ConversionWarning::TwoBandMerge));

    // means are 10 and 30
    let gray = read_output(&output).to_luma8();
    assert_eq!(gray.get_pixel(0, 0).0, [0]);
    assert_eq!(gray.get_pixel(1, 0).0, [255]);
}

#[test]
fn test_single_band_stays_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mono.tif");
    let output = dir.path().join("mono.png");
    RasterFixture::from_fn(3, 1, 1, SampleKind::U16, |_, x, _| 1000.0 + x as f64 * 500.0).write(&input);

    let report = convert_file(&input, &output, &ConversionOptions::default()).unwrap();
    assert_eq!(report.output_channels, 1);

    let gray = read_output(&output).to_luma8();
    assert_eq!(gray.as_raw(), &vec![0, 128, 255]);
}

#[test]
fn test_bit_depth_divisor_truncates_and_warns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("twelve.tif");
    let output = dir.path().join("twelve.png");
    RasterFixture::from_fn(2, 1, 3, SampleKind::U16, |_, x, _| if x == 0 { 2048.0 } else { 5000.0 }).write(&input);

    let options = ConversionOptions {
        bit_depth_divisor: Some(4096.0),
        ..ConversionOptions::default()
    };
    let report = convert_file(&input, &output, &options).unwrap();
    assert!(report.warnings.iter().any(|w| matches!(w, ConversionWarning::BitDepth { .. })));

    let rgb = read_output(&output).to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [127, 127, 127]);
    assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
}

#[test]
fn test_percentile_stretch_clips_outliers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("outlier.tif");
    let output = dir.path().join("outlier.png");
    // 100 pixels of 0..99 and one huge outlier
    RasterFixture::from_fn(101, 1, 1, SampleKind::U16, |_, x, _| if x == 100 { 60000.0 } else { x as f64 })
        .write(&input);

    let options = ConversionOptions {
        use_stretch: true,
        stretch_percentile: 2.0,
        ..ConversionOptions::default()
    };
    convert_file(&input, &output, &options).unwrap();

    let gray = read_output(&output).to_luma8();
    assert_eq!(gray.get_pixel(0, 0).0, [0]);
    assert_eq!(gray.get_pixel(100, 0).0, [255]);
    // the middle of the range lands near the middle of the output
    let mid = gray.get_pixel(50, 0).0[0];
    assert!((120..=136).contains(&mid), "mid value {}", mid);
}

#[test]
fn test_swap_rb_channel_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rgb.tif");
    let output = dir.path().join("bgr.png");
    RasterFixture::from_fn(2, 1, 3, SampleKind::U8, |_, x, b| if x == 0 { 0.0 } else { [200.0, 100.0, 0.0][b] })
        .write(&input);

    let options = ConversionOptions {
        channel_order: ChannelOrderCorrection::SwapRbToBgr,
        ..ConversionOptions::default()
    };
    convert_file(&input, &output, &options).unwrap();

    let rgb = read_output(&output).to_rgb8();
    assert_eq!(rgb.get_pixel(1, 0).0, [0, 128, 255]);
}

#[test]
fn test_jpeg_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.tif");
    let output = dir.path().join("scene.JPG");
    RasterFixture::from_fn(16, 16, 3, SampleKind::U8, |y, x, b| (y * 8 + x + b * 10) as f64).write(&input);

    let options = ConversionOptions {
        jpeg_quality: 80,
        ..ConversionOptions::default()
    };
    convert_file(&input, &output, &options).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(read_output(&output).to_rgb8().dimensions(), (16, 16));
}

#[test]
fn test_output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.tif");
    let output = dir.path().join("nested").join("deeper").join("out.png");
    RasterFixture::constant_bands(2, 2, SampleKind::U8, &[1.0, 2.0, 3.0]).write(&input);

    convert_file(&input, &output, &ConversionOptions::default()).unwrap();
    assert!(output.is_file());
}

#[test]
fn test_unsupported_output_extension_fails_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bmp");

    let err = convert_file(&dir.path().join("absent.tif"), &output, &ConversionOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Config(_)));
    assert!(!output.exists());
}

#[test]
fn test_failed_conversion_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nan.tif");
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    RasterFixture::from_fn(2, 2, 3, SampleKind::F32, |_, _, _| f64::NAN).write(&input);

    let err = convert_file(&input, &out_dir.join("nan.png"), &ConversionOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::DegenerateRange(_)));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn test_corrupt_input_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("corrupt.tif");
    let output = dir.path().join("corrupt.png");
    let mut bytes = RasterFixture::constant_bands(8, 8, SampleKind::U16, &[1.0, 2.0, 3.0]).to_bytes();
    // cut inside the pixel data; the IFD is lost with it
    bytes.truncate(200);
    let ifd_offset = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    assert!((ifd_offset as usize) > bytes.len());
    std::fs::write(&input, &bytes).unwrap();

    assert!(convert_file(&input, &output, &ConversionOptions::default()).is_err());
    assert!(!output.exists());
}
