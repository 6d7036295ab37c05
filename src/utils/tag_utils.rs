//! TIFF tag utilities
//!
//! Utilities for working with TIFF tags and their values.

use byteorder::ReadBytesExt;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, field_types, photometric, tags};
use crate::tiff::errors::{TiffError, TiffResult};

/// Reads `count` values of `field_type` into `values`
///
/// Rationals are packed as numerator in the high and denominator in the
/// low 32 bits.
pub fn read_tag_value_array(
    reader: &mut dyn SeekableReader,
    field_type: u16,
    count: u64,
    handler: &dyn ByteOrderHandler,
    values: &mut Vec<u64>,
) -> TiffResult<()> {
    for _ in 0..count {
        let value = match field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => {
                reader.read_u8()? as u64
            }
            field_types::SHORT | field_types::SSHORT => handler.read_u16(reader)? as u64,
            field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => {
                handler.read_u32(reader)? as u64
            }
            field_types::RATIONAL | field_types::SRATIONAL => {
                let numerator = handler.read_u32(reader)? as u64;
                let denominator = handler.read_u32(reader)? as u64;
                (numerator << 32) | denominator
            }
            field_types::DOUBLE | field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => {
                handler.read_u64(reader)?
            }
            _ => return Err(TiffError::UnsupportedFieldType(field_type)),
        };

        values.push(value);
    }

    Ok(())
}

/// Size in bytes of one value of the given field type
pub fn get_field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE |
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Determines if a tag's values are stored inside the entry itself
///
/// Classic TIFF entries have 4 bytes of room, BigTIFF entries 8.
pub fn is_value_inline(field_type: u16, count: u64, is_big_tiff: bool) -> bool {
    let inline_size = if is_big_tiff { 8 } else { 4 };

    (get_field_type_size(field_type) as u64)
        .checked_mul(count)
        .map_or(false, |total| total <= inline_size)
}

/// Get the name of a TIFF tag
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::FILL_ORDER => "FillOrder",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PAGE_NAME => "PageName",
        tags::PREDICTOR => "Predictor",
        tags::COLOR_MAP => "ColorMap",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::EXTRA_SAMPLES => "ExtraSamples",
        tags::SAMPLE_FORMAT => "SampleFormat",
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
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
        field_types::IFD => "IFD",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match u16::try_from(compression_code) {
        Ok(compression::NONE) => "None",
        Ok(compression::LZW) => "LZW",
        Ok(compression::DEFLATE) | Ok(compression::DEFLATE_LEGACY) => "Adobe Deflate",
        Ok(compression::ZSTD) => "Zstandard",
        Ok(compression::PACKBITS) => "PackBits",
        _ => "Unknown",
    }
}

/// Get the name of a photometric interpretation method
pub fn get_photometric_name(photometric_code: u64) -> &'static str {
    match u16::try_from(photometric_code) {
        Ok(photometric::WHITE_IS_ZERO) => "WhiteIsZero",
        Ok(photometric::BLACK_IS_ZERO) => "BlackIsZero",
        Ok(photometric::RGB) => "RGB",
        Ok(photometric::PALETTE) => "Palette",
        _ => "Unknown",
    }
}
