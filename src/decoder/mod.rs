//! Page-region decoding
//!
//! The `RegionDecoder` trait is the decoding capability the fetcher calls;
//! `TiffRegionDecoder` implements it for TIFF and BigTIFF files.

mod chunk_reader;
mod layout;
mod pixel;
mod predictor;
mod region;
mod region_reader;
mod tiff_decoder;

pub use layout::{AlphaMode, ColorModel, PageLayout};
pub use pixel::RGBA_CHANNELS;
pub use region::{PixelRect, Region, RegionPolicy};
pub use tiff_decoder::{DecoderSettings, TiffRegionDecoder};

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffResult;

/// Options for one decode: which page, how much to downsample, which area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Zero-based page (directory) index
    pub page: usize,
    /// Keep every n-th pixel in each direction; must be at least 1
    pub sample_size: u32,
    /// Area of the page at native resolution
    pub region: Region,
}

/// Decoded pixels, interleaved RGBA8, row-major without padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// RGBA value of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; RGBA_CHANNELS]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        let mut pixel = [0u8; RGBA_CHANNELS];
        pixel.copy_from_slice(&self.data[at..at + RGBA_CHANNELS]);
        Some(pixel)
    }
}

/// Capability that decodes a region of a page from an open byte stream
///
/// `Ok(None)` means the decoder ran but cannot produce this region: no
/// such page, empty region, or a layout it does not support. `Err` means
/// reading or decompressing failed.
pub trait RegionDecoder: Send + Sync {
    fn decode(&self, source: &mut dyn SeekableReader, options: &DecodeOptions) -> TiffResult<Option<PixelBuffer>>;
}
