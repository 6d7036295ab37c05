//! Handler for PackBits compressed data

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// PackBits run-length handler (compression code 32773)
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(expected_len);
        let mut pos = 0;

        while pos < data.len() && out.len() < expected_len {
            let header = data[pos] as i8;
            pos += 1;

            match header {
                // -128 is a no-op
                -128 => {}
                0..=127 => {
                    let literal_len = header as usize + 1;
                    let literal = data.get(pos..pos + literal_len).ok_or_else(|| {
                        TiffError::CorruptData("PackBits literal run past end of data".to_string())
                    })?;
                    out.extend_from_slice(literal);
                    pos += literal_len;
                }
                _ => {
                    let repeat = 1 - header as isize;
                    let value = *data.get(pos).ok_or_else(|| {
                        TiffError::CorruptData("PackBits repeat run past end of data".to_string())
                    })?;
                    out.extend(std::iter::repeat(value).take(repeat as usize));
                    pos += 1;
                }
            }
        }

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }
}
