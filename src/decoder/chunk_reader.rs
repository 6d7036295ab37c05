//! Reading and decompressing single strips or tiles

use log::{debug, trace};
use std::io::SeekFrom;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;

use super::layout::PageLayout;
use super::predictor::undo_horizontal_differencing;

/// Reads chunks of one page from an open source
pub struct ChunkReader<'a> {
    source: &'a mut dyn SeekableReader,
    layout: &'a PageLayout,
    compression_handler: Box<dyn CompressionHandler>,
    file_size: u64,
}

impl<'a> ChunkReader<'a> {
    /// Create a chunk reader for the page described by `layout`
    ///
    /// Fails with `UnsupportedCompression` when no handler exists for the
    /// page's compression.
    pub fn new(source: &'a mut dyn SeekableReader, layout: &'a PageLayout) -> TiffResult<Self> {
        let compression_handler = CompressionFactory::create_handler(layout.compression)?;
        debug!("Using compression: {}", compression_handler.name());
        let file_size = validation::get_file_size(source)?;

        Ok(ChunkReader {
            source,
            layout,
            compression_handler,
            file_size,
        })
    }

    /// Reads chunk `index` and returns exactly `rows` decoded rows of it
    ///
    /// # Arguments
    /// * `index` - Row-major index of the strip or tile
    /// * `rows` - Number of rows the chunk is expected to hold
    pub fn read_chunk(&mut self, index: usize, rows: u32) -> TiffResult<Vec<u8>> {
        let grid = &self.layout.grid;
        let offset = grid.offsets[index];
        let byte_count = grid.byte_counts[index];
        let row_bytes = self.layout.chunk_row_bytes();
        let expected_len = row_bytes * rows as usize;

        let end = offset.checked_add(byte_count);
        if byte_count == 0 || end.map_or(true, |end| end > self.file_size) {
            return Err(TiffError::CorruptData(format!(
                "Chunk {} at offset {} with {} bytes exceeds file size {}",
                index, offset, byte_count, self.file_size
            )));
        }

        trace!("Reading chunk {} at offset {} with {} bytes", index, offset, byte_count);

        self.source.seek(SeekFrom::Start(offset))?;
        let mut compressed = vec![0u8; byte_count as usize];
        self.source.read_exact(&mut compressed)?;

        if self.layout.reverse_bits {
            for byte in compressed.iter_mut() {
                *byte = byte.reverse_bits();
            }
        }

        let mut data = self.compression_handler.decompress(&compressed, expected_len)?;
        if data.len() < expected_len {
            return Err(TiffError::CorruptData(format!(
                "Chunk {} decoded to {} bytes, expected {}",
                index, data.len(), expected_len
            )));
        }
        data.truncate(expected_len);

        if self.layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
            undo_horizontal_differencing(
                &mut data,
                row_bytes,
                self.layout.samples_per_pixel as usize,
                self.layout.bits_per_sample,
                self.layout.byte_order,
            );
        }

        Ok(data)
    }
}
