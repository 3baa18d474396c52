//! TIFF tag utilities
//!
//! Reading tag value arrays and naming tags, field types, compression
//! methods and photometric interpretations for reports.

use byteorder::ReadBytesExt;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::tiff::constants::{field_types, tags, compression, photometric, planar_config};

/// Reads `entry.count` values of the entry's field type as u64
///
/// FLOAT values come back as their bit patterns; RATIONALs pack the
/// numerator in the high 32 bits.
pub fn read_tag_value_array(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
    values: &mut Vec<u64>,
) -> TiffResult<()> {
    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED | field_types::ASCII => {
                reader.read_u8()? as u64
            },
            field_types::SHORT | field_types::SSHORT => handler.read_u16(reader)? as u64,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => handler.read_u32(reader)? as u64,
            field_types::RATIONAL | field_types::SRATIONAL => {
                let numerator = handler.read_u32(reader)? as u64;
                let denominator = handler.read_u32(reader)? as u64;
                (numerator << 32) | denominator
            },
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 | field_types::DOUBLE => {
                handler.read_u64(reader)?
            },
            _ => return Err(TiffError::UnsupportedFieldType(entry.field_type)),
        };

        values.push(value);
    }

    Ok(())
}

pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::EXTRA_SAMPLES => "ExtraSamples",
        tags::SAMPLE_FORMAT => "SampleFormat",
        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScale",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepoint",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GDAL_METADATA => "GDALMetadata",
        tags::GDAL_NODATA => "GDALNoData",
        _ => "Unknown",
    }
}

pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code as u16 {
        compression::NONE => "None",
        compression::CCITT_RLE => "CCITT RLE",
        compression::LZW => "LZW",
        compression::JPEG_OLD => "Old JPEG",
        compression::JPEG => "JPEG",
        compression::DEFLATE => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        compression::DEFLATE_LEGACY => "Deflate",
        _ => "Unknown",
    }
}

pub fn get_photometric_name(photometric_code: u64) -> &'static str {
    match photometric_code as u16 {
        photometric::WHITE_IS_ZERO => "WhiteIsZero",
        photometric::BLACK_IS_ZERO => "BlackIsZero",
        photometric::RGB => "RGB",
        photometric::PALETTE => "Palette",
        photometric::TRANSPARENCY_MASK => "TransparencyMask",
        photometric::CMYK => "CMYK",
        photometric::YCBCR => "YCbCr",
        photometric::CIELAB => "CIELAB",
        _ => "Unknown",
    }
}

pub fn get_planar_config_name(planar_code: u64) -> &'static str {
    match planar_code as u16 {
        planar_config::CHUNKY => "Chunky (interleaved)",
        planar_config::PLANAR => "Planar (band sequential)",
        _ => "Unknown",
    }
}
