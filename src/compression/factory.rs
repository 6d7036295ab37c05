//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::zstd::ZstdHandler;
use super::lzw::LzwHandler;
use super::packbits::PackBitsHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match u16::try_from(code) {
            Ok(compression::NONE) => Ok(Box::new(UncompressedHandler)),
            Ok(compression::LZW) => Ok(Box::new(LzwHandler)),
            Ok(compression::DEFLATE) | Ok(compression::DEFLATE_LEGACY) => Ok(Box::new(AdobeDeflateHandler)),
            Ok(compression::ZSTD) => Ok(Box::new(ZstdHandler)),
            Ok(compression::PACKBITS) => Ok(Box::new(PackBitsHandler)),
            _ => Err(TiffError::UnsupportedCompression(code)),
        }
    }

    /// Whether a handler exists for the given compression code
    pub fn is_supported(code: u64) -> bool {
        Self::create_handler(code).is_ok()
    }
}
