//! 8-bit image encoding with atomic output files

use log::debug;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use ndarray::Array3;
use tempfile::NamedTempFile;

use crate::convert::errors::{ConvertError, ConvertResult};
use crate::convert::format::OutputFormat;

/// Encodes `data` (H, W, 1 or 3) and writes it to `path`
///
/// The image is written to a temporary file next to `path` and renamed into
/// place once complete; on failure the temporary file is removed. Missing
/// parent directories are created.
pub fn write_image(data: &Array3<u8>, path: &Path, format: OutputFormat, jpeg_quality: u8) -> ConvertResult<()> {
    let (height, width, channels) = data.dim();
    let color_type = match channels {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        other => {
            return Err(ConvertError::Shape(format!(
                "cannot encode {} channels, expected 1 or 3", other)));
        },
    };

    let width = u32::try_from(width).map_err(|_| ConvertError::encode(path, "image too wide"))?;
    let height = u32::try_from(height).map_err(|_| ConvertError::encode(path, "image too tall"))?;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| ConvertError::encode(path, e))?;

    let pixels: Vec<u8> = data.iter().copied().collect();
    let mut temp = NamedTempFile::new_in(parent).map_err(|e| ConvertError::encode(path, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let encoded = match format {
            OutputFormat::Png => PngEncoder::new(&mut writer)
                .write_image(&pixels, width, height, color_type),
            OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut writer, jpeg_quality)
                .write_image(&pixels, width, height, color_type),
        };
        encoded.map_err(|e| ConvertError::encode(path, e))?;
        writer.flush().map_err(|e| ConvertError::encode(path, e))?;
    }

    temp.persist(path).map_err(|e| ConvertError::encode(path, e.error))?;
    debug!("Wrote {}x{} {} image to {}", width, height, format, path.display());

    Ok(())
}
