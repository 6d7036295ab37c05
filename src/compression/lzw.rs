//! Handler for LZW compressed data

use weezl::LzwStatus;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// LZW compression handler (compression code 5)
///
/// TIFF LZW is MSB-first with the early code-size switch. Some writers omit
/// the end-of-information code, so running out of input is not an error.
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = weezl::decode::Decoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8);
        let mut decompressed_data = vec![0u8; expected_len];
        let mut consumed = 0;
        let mut filled = 0;

        while filled < expected_len {
            let result = decoder.decode_bytes(&data[consumed..], &mut decompressed_data[filled..]);
            consumed += result.consumed_in;
            filled += result.consumed_out;

            match result.status {
                Ok(LzwStatus::Ok) if result.consumed_in > 0 || result.consumed_out > 0 => {}
                Ok(_) => break,
                Err(e) => return Err(TiffError::CorruptData(format!("LZW stream: {}", e))),
            }
        }

        decompressed_data.truncate(filled);
        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }
}
