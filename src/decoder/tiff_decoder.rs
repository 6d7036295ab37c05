//! TIFF implementation of the region decoding capability

use log::{debug, info, warn};

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::{TiffReaderBuilder, DEFAULT_MAX_PAGES};

use super::chunk_reader::ChunkReader;
use super::layout::PageLayout;
use super::region::RegionPolicy;
use super::region_reader::RegionReader;
use super::{DecodeOptions, PixelBuffer, RegionDecoder};

/// Default cap on decoded pixels per request (8192 x 8192)
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// Default cap on the decompressed size of one strip or tile
pub const DEFAULT_MAX_CHUNK_BYTES: u64 = 512 * 1024 * 1024;

/// Limits and policies applied by `TiffRegionDecoder`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderSettings {
    /// What to do with regions not fully inside the page
    pub region_policy: RegionPolicy,
    /// Largest output, in pixels, a single decode may produce
    pub max_output_pixels: u64,
    /// Largest decompressed strip or tile, in bytes, a decode may allocate
    pub max_chunk_bytes: u64,
    /// Maximum number of pages read from a document
    pub max_pages: usize,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        DecoderSettings {
            region_policy: RegionPolicy::Clip,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Decodes page regions of TIFF and BigTIFF files
///
/// Holds only immutable settings, so one instance can serve concurrent
/// decodes on different sources.
#[derive(Debug, Clone, Default)]
pub struct TiffRegionDecoder {
    settings: DecoderSettings,
}

impl TiffRegionDecoder {
    pub fn new(settings: DecoderSettings) -> Self {
        TiffRegionDecoder { settings }
    }

    pub fn settings(&self) -> &DecoderSettings {
        &self.settings
    }

    /// Decodes the requested region, reporting undecodable requests as errors
    pub fn decode_region(&self, source: &mut dyn SeekableReader, options: &DecodeOptions) -> TiffResult<PixelBuffer> {
        if options.sample_size == 0 {
            return Err(TiffError::UnsupportedLayout("sample size 0".to_string()));
        }

        let mut tiff_reader = TiffReaderBuilder::new()
            .max_pages(self.settings.max_pages)
            .build();
        let document = tiff_reader.read(source)?;
        let ifd = document.page(options.page)?;

        let layout = PageLayout::from_ifd(&tiff_reader, source, ifd, document.byte_order)?;
        let chunk_bytes = layout.chunk_bytes().unwrap_or(u64::MAX);
        if chunk_bytes > self.settings.max_chunk_bytes {
            return Err(TiffError::UnsupportedLayout(format!(
                "{}x{} chunks exceed the limit of {} bytes",
                layout.grid.chunk_width, layout.grid.chunk_height, self.settings.max_chunk_bytes
            )));
        }

        let rect = options.region.place(layout.width, layout.height, self.settings.region_policy)?;

        let (out_width, out_height) = rect.sampled_dimensions(options.sample_size);
        let out_pixels = out_width as u64 * out_height as u64;
        if out_pixels > self.settings.max_output_pixels {
            return Err(TiffError::UnsupportedLayout(format!(
                "{}x{} output exceeds the limit of {} pixels",
                out_width, out_height, self.settings.max_output_pixels
            )));
        }

        info!("Decoding page {} of {}: {:?} at 1/{} -> {}x{}",
              options.page, document.page_count(), rect, options.sample_size, out_width, out_height);

        let chunks = ChunkReader::new(source, &layout)?;
        RegionReader::new(chunks, &layout).read(rect, options.sample_size)
    }
}

impl RegionDecoder for TiffRegionDecoder {
    fn decode(&self, source: &mut dyn SeekableReader, options: &DecodeOptions) -> TiffResult<Option<PixelBuffer>> {
        match self.decode_region(source, options) {
            Ok(buffer) => Ok(Some(buffer)),
            Err(e) if e.is_undecodable() => {
                warn!("Cannot decode page {} region {}: {}", options.page, options.region, e);
                Ok(None)
            }
            Err(e) => {
                debug!("Decoding page {} failed: {}", options.page, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Region;
    use std::io::Cursor;

    #[test]
    fn zero_sample_size_decodes_to_nothing() {
        let options = DecodeOptions { page: 0, sample_size: 0, region: Region::new(0, 0, 1, 1) };
        let result = TiffRegionDecoder::default().decode(&mut Cursor::new(Vec::new()), &options);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn empty_input_is_a_read_error() {
        let options = DecodeOptions { page: 0, sample_size: 1, region: Region::new(0, 0, 1, 1) };
        let result = TiffRegionDecoder::default().decode(&mut Cursor::new(Vec::new()), &options);
        assert!(matches!(result, Err(TiffError::IoError(_))));
    }

    #[test]
    fn default_settings() {
        let settings = DecoderSettings::default();
        assert_eq!(settings.region_policy, RegionPolicy::Clip);
        assert_eq!(settings.max_output_pixels, 64 * 1024 * 1024);
        assert_eq!(settings.max_chunk_bytes, 512 * 1024 * 1024);
        assert_eq!(settings.max_pages, 1024);
    }
}
