//! IFD utilities
//!
//! Offsets in the header and at the end of each directory are 4 bytes in
//! classic TIFF and 8 bytes in BigTIFF.

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::TiffResult;

/// Reads an IFD offset at the current position
///
/// Used for the header's first-IFD offset, the next-IFD link after each
/// directory and out-of-line value offsets. Zero means "no more IFDs".
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    let offset = if is_big_tiff {
        byte_order_handler.read_u64(reader)?
    } else {
        byte_order_handler.read_u32(reader)? as u64
    };

    Ok(offset)
}
