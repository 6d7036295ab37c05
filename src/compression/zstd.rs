//! Handler for ZSTD compressed data

use std::io::Read;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use log::{debug, warn};

/// ZSTD compression handler (compression code 14)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        debug!("ZSTD decompressing {} bytes", data.len());
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let corrupt = |e: std::io::Error| {
            warn!("ZSTD decompression error: {}", e);
            TiffError::CorruptData(format!("ZSTD stream: {}", e))
        };

        let decoder = zstd::stream::read::Decoder::new(data).map_err(corrupt)?;
        let mut decompressed_data = Vec::with_capacity(expected_len);
        decoder.take(expected_len as u64)
            .read_to_end(&mut decompressed_data)
            .map_err(corrupt)?;
        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }
}
