//! Horizontal differencing predictor
//!
//! With Predictor 2 each sample is stored as the difference from the same
//! sample of the previous pixel in the row; decoding is a running sum per
//! row and per sample channel.

use crate::io::byte_order::ByteOrder;

/// Reverses horizontal differencing in place over whole rows of a chunk
///
/// # Arguments
/// * `data` - Decompressed chunk, rows of `row_bytes` bytes
/// * `row_bytes` - Bytes per chunk row
/// * `samples_per_pixel` - Interleaved samples per pixel
/// * `bits_per_sample` - 8 or 16
/// * `byte_order` - Byte order of 16-bit samples
pub fn undo_horizontal_differencing(
    data: &mut [u8],
    row_bytes: usize,
    samples_per_pixel: usize,
    bits_per_sample: u16,
    byte_order: ByteOrder,
) {
    if row_bytes == 0 {
        return;
    }

    for row in data.chunks_exact_mut(row_bytes) {
        match bits_per_sample {
            8 => {
                for i in samples_per_pixel..row.len() {
                    row[i] = row[i].wrapping_add(row[i - samples_per_pixel]);
                }
            }
            16 => {
                let stride = samples_per_pixel * 2;
                for i in (stride..row.len().saturating_sub(1)).step_by(2) {
                    let previous = byte_order.u16_from_bytes([row[i - stride], row[i - stride + 1]]);
                    let current = byte_order.u16_from_bytes([row[i], row[i + 1]]);
                    let [first, second] = byte_order.u16_to_bytes(current.wrapping_add(previous));
                    row[i] = first;
                    row[i + 1] = second;
                }
            }
            _ => {}
        }
    }
}
