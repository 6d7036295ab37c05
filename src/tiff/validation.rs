//! TIFF validation utilities
//!
//! Bounds checks that keep malformed files from sending the reader to
//! absurd offsets or into huge allocations.

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::utils::tag_utils;

/// Upper bound on entries in one directory
const MAX_IFD_ENTRIES: u64 = 4096;

/// Validates an IFD offset to ensure it's within reasonable bounds
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < header::MIN_IFD_OFFSET {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Gets the file size, restoring the reader position afterwards
///
/// Falls back to `u64::MAX` when the end cannot be determined.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates the BigTIFF header fields that follow the version number
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTIFFHeader);
    }

    Ok(())
}

/// Rejects directories claiming an implausible number of entries
pub fn validate_entry_count(count: u64, is_big_tiff: bool) -> TiffResult<()> {
    if count == 0 || count > MAX_IFD_ENTRIES {
        return Err(TiffError::GenericError(format!(
            "Invalid {} IFD entry count: {}",
            if is_big_tiff { "BigTIFF" } else { "TIFF" },
            count
        )));
    }

    Ok(())
}

/// Checks that an out-of-line value array lies inside the file
pub fn validate_value_extent(entry: &IFDEntry, file_size: u64) -> TiffResult<()> {
    let size = (tag_utils::get_field_type_size(entry.field_type) as u64)
        .checked_mul(entry.count);

    match size.and_then(|size| entry.value_offset.checked_add(size)) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(TiffError::CorruptData(format!(
            "Values of tag {} ({} x type {}) at offset {} exceed file size {}",
            entry.tag, entry.count, entry.field_type, entry.value_offset, file_size
        ))),
    }
}

/// Validates a numeric range to ensure it's within bounds
pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> TiffResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(TiffError::UnsupportedLayout(format!(
            "{} {} (must be between {} and {})",
            name, value, min, max
        )));
    }

    Ok(())
}
