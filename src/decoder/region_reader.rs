//! Assembling a sampled region from the chunks that cover it
//!
//! Works the same for strips and tiles: every chunk of the grid that holds
//! at least one sampled pixel of the region is read once, and its sampled
//! pixels are copied into the output buffer.

use log::debug;

use crate::tiff::errors::{TiffError, TiffResult};

use super::chunk_reader::ChunkReader;
use super::layout::PageLayout;
use super::pixel::{PixelConverter, RGBA_CHANNELS};
use super::region::PixelRect;
use super::PixelBuffer;

/// Index of the first sampled output position at or after `bound`
///
/// Output position `o` samples source coordinate `origin + o * sample_size`.
fn first_sample_at(bound: u32, origin: u32, sample_size: u32) -> u32 {
    if bound <= origin {
        0
    } else {
        (bound - origin).div_ceil(sample_size)
    }
}

/// Decodes sampled regions of one page
pub struct RegionReader<'a> {
    chunks: ChunkReader<'a>,
    layout: &'a PageLayout,
}

impl<'a> RegionReader<'a> {
    pub fn new(chunks: ChunkReader<'a>, layout: &'a PageLayout) -> Self {
        RegionReader { chunks, layout }
    }

    /// Decode `rect`, keeping every `sample_size`-th pixel in each direction
    pub fn read(&mut self, rect: PixelRect, sample_size: u32) -> TiffResult<PixelBuffer> {
        let (out_width, out_height) = rect.sampled_dimensions(sample_size);
        let len = (out_width as usize)
            .checked_mul(out_height as usize)
            .and_then(|pixels| pixels.checked_mul(RGBA_CHANNELS))
            .ok_or_else(|| TiffError::UnsupportedLayout("output size overflows".to_string()))?;
        let mut data = vec![0u8; len];

        let layout = self.layout;
        let grid = &layout.grid;
        let converter = PixelConverter::new(layout);
        let row_bytes = layout.chunk_row_bytes();

        let first_chunk_row = rect.y / grid.chunk_height;
        let last_chunk_row = (rect.end_y() - 1) / grid.chunk_height;
        let first_chunk_col = rect.x / grid.chunk_width;
        let last_chunk_col = (rect.end_x() - 1) / grid.chunk_width;
        let mut chunks_read = 0;

        for chunk_row in first_chunk_row..=last_chunk_row {
            let rows = grid.rows_in_chunk(chunk_row, layout.height);
            let chunk_y0 = chunk_row * grid.chunk_height;
            let chunk_y1 = chunk_y0.saturating_add(rows).min(rect.end_y());
            let out_y_start = first_sample_at(chunk_y0, rect.y, sample_size);
            let out_y_end = first_sample_at(chunk_y1, rect.y, sample_size).min(out_height);
            if out_y_start >= out_y_end {
                continue;
            }

            for chunk_col in first_chunk_col..=last_chunk_col {
                let chunk_x0 = chunk_col * grid.chunk_width;
                let chunk_x1 = chunk_x0.saturating_add(grid.chunk_width).min(rect.end_x());
                let out_x_start = first_sample_at(chunk_x0, rect.x, sample_size);
                let out_x_end = first_sample_at(chunk_x1, rect.x, sample_size).min(out_width);
                if out_x_start >= out_x_end {
                    continue;
                }

                let index = chunk_row as usize * grid.chunks_across as usize + chunk_col as usize;
                let chunk = self.chunks.read_chunk(index, rows)?;
                chunks_read += 1;

                for out_y in out_y_start..out_y_end {
                    let source_y = rect.y + out_y * sample_size;
                    let row_start = (source_y - chunk_y0) as usize * row_bytes;
                    let row = &chunk[row_start..row_start + row_bytes];

                    for out_x in out_x_start..out_x_end {
                        let source_x = rect.x + out_x * sample_size;
                        let pixel = converter.pixel_at(row, source_x - chunk_x0);
                        let at = (out_y as usize * out_width as usize + out_x as usize) * RGBA_CHANNELS;
                        data[at..at + RGBA_CHANNELS].copy_from_slice(&pixel);
                    }
                }
            }
        }

        debug!("Decoded {}x{} pixels from {} chunk(s)", out_width, out_height, chunks_read);

        Ok(PixelBuffer {
            width: out_width,
            height: out_height,
            data,
        })
    }
}
