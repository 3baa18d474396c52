//! Folder and file-list conversion

mod common;

use std::fs;
use std::path::PathBuf;

use common::{RasterFixture, SampleKind};
use tif2image::convert::{output_path, DirectoryLister, FileLister};
use tif2image::{BatchConverter, ConversionOptions, ConversionWarning, ConvertError, OutputFormat, Tif2Image};

fn rgb_fixture(seed: f64) -> RasterFixture {
    RasterFixture::from_fn(4, 3, 3, SampleKind::U16, move |y, x, b| seed + (y * 4 + x) as f64 * 10.0 + b as f64)
}

#[test]
fn test_directory_lister_filters_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.tif", "a.TIF", "c.tiff", "notes.txt", "d.Tif"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::create_dir(dir.path().join("nested.tif")).unwrap();

    let files = DirectoryLister::default().list(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.TIF", "b.tif", "d.Tif"]);
}

#[test]
fn test_folder_conversion_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();

    rgb_fixture(0.0).write(&input.join("first.tif"));
    fs::write(input.join("broken.tif"), b"II*\0garbage").unwrap();
    rgb_fixture(500.0).write(&input.join("third.TIF"));
    fs::write(input.join("readme.md"), b"not a raster").unwrap();

    let converter = BatchConverter::with_directory_lister(ConversionOptions::default());
    let report = converter.convert_folder(&input, &output, OutputFormat::Png).unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.converted.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, input.join("broken.tif"));
    assert!(matches!(report.failed[0].error, ConvertError::SourceRead { .. }));

    let mut written: Vec<String> = fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    written.sort();
    assert_eq!(written, vec!["first.png", "third.png"]);
}

#[test]
fn test_empty_folder_reports_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("other.png"), b"x").unwrap();

    let report = Tif2Image::default()
        .convert_folder(dir.path(), &dir.path().join("out"), OutputFormat::Jpeg)
        .unwrap();
    assert_eq!(report.total(), 0);
    assert_eq!(report.warnings, vec![ConversionWarning::EmptyInput { dir: dir.path().to_path_buf() }]);
    assert!(dir.path().join("out").is_dir());
}

#[test]
fn test_missing_folder_is_source_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Tif2Image::default()
        .convert_folder(&dir.path().join("absent"), &dir.path().join("out"), OutputFormat::Png)
        .unwrap_err();
    assert!(matches!(err, ConvertError::SourceRead { .. }));
}

#[test]
fn test_file_list_to_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = (0..3).map(|i| dir.path().join(format!("scene_{}.tif", i))).collect();
    for (i, path) in inputs.iter().enumerate() {
        rgb_fixture(i as f64 * 100.0).write(path);
    }
    let out = dir.path().join("jpeg");

    let report = Tif2Image::default().convert_files(&inputs, &out, OutputFormat::Jpeg).unwrap();
    assert!(!report.has_failures());
    for (input, converted) in inputs.iter().zip(&report.converted) {
        assert_eq!(&converted.input, input);
        assert_eq!(converted.output, output_path(input, &out, OutputFormat::Jpeg).unwrap());
        assert!(converted.output.is_file());
    }
}

#[test]
fn test_same_stem_from_two_folders_keeps_first_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("east")).unwrap();
    let inputs = vec![dir.path().join("scene.tif"), dir.path().join("east").join("scene.tif")];
    rgb_fixture(0.0).write(&inputs[0]);
    rgb_fixture(900.0).write(&inputs[1]);
    let out = dir.path().join("png");

    let report = Tif2Image::default().convert_files(&inputs, &out, OutputFormat::Png).unwrap();
    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.converted[0].input, inputs[0]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, inputs[1]);
    assert!(matches!(report.failed[0].error, ConvertError::Config(_)));
    assert!(out.join("scene.png").is_file());
}
