//! Page layout: everything needed to turn a page's chunks into pixels
//!
//! Reads the tags of one IFD, checks that the sample layout is one the
//! region decoder can convert to RGBA, and records how the pixel data is
//! split into strips or tiles.

use log::debug;

use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{extra_samples, photometric, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

/// How an alpha channel, if any, relates to the color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Colors are already multiplied by alpha
    Associated,
    /// Colors are independent of alpha
    Unassociated,
}

/// Color model of the page, reduced to what the converter needs
#[derive(Debug, Clone, PartialEq)]
pub enum ColorModel {
    /// One gray channel; `inverted` for WhiteIsZero
    Gray { inverted: bool },
    /// Three color channels
    Rgb,
    /// One index channel into a colormap of 8-bit RGB triples
    Palette { colormap: Vec<[u8; 3]> },
}

impl ColorModel {
    /// Number of samples the color model itself uses per pixel
    pub fn color_samples(&self) -> u16 {
        match self {
            ColorModel::Rgb => 3,
            ColorModel::Gray { .. } | ColorModel::Palette { .. } => 1,
        }
    }
}

/// Grid of strips or tiles holding the page's pixel data
#[derive(Debug, Clone)]
pub struct ChunkGrid {
    /// Width in pixels of every chunk (the page width for strips)
    pub chunk_width: u32,
    /// Height in pixels of every full chunk (rows per strip for strips)
    pub chunk_height: u32,
    /// Chunks per row of the grid
    pub chunks_across: u32,
    /// Chunks per column of the grid
    pub chunks_down: u32,
    /// File offsets of the chunks, row-major
    pub offsets: Vec<u64>,
    /// Compressed sizes of the chunks, row-major
    pub byte_counts: Vec<u64>,
    /// Whether the grid is made of tiles
    pub tiled: bool,
}

impl ChunkGrid {
    /// Number of pixel rows stored in the chunk at grid row `chunk_row`
    ///
    /// Tiles always hold full rows; the last strip may be shorter.
    pub fn rows_in_chunk(&self, chunk_row: u32, page_height: u32) -> u32 {
        if self.tiled {
            self.chunk_height
        } else {
            let start = chunk_row * self.chunk_height;
            self.chunk_height.min(page_height.saturating_sub(start))
        }
    }
}

/// Decoding parameters of one page
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub color: ColorModel,
    /// Index of the alpha sample within a pixel, with its meaning
    pub alpha: Option<(u16, AlphaMode)>,
    pub compression: u64,
    pub predictor: u16,
    /// Whether compressed bytes have their bit order reversed (FillOrder 2)
    pub reverse_bits: bool,
    pub byte_order: ByteOrder,
    pub grid: ChunkGrid,
}

impl PageLayout {
    /// Reads and validates the layout of `ifd`
    ///
    /// Layouts the converter cannot handle are reported as undecodable
    /// errors (`UnsupportedLayout`, `UnsupportedPhotometric`, ...).
    pub fn from_ifd(
        tiff_reader: &TiffReader,
        source: &mut dyn SeekableReader,
        ifd: &IFD,
        byte_order: ByteOrder,
    ) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        if width == 0 || height == 0 || width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(TiffError::MissingDimensions);
        }
        let (width, height) = (width as u32, height as u32);

        let samples_per_pixel = ifd.get_samples_per_pixel();
        validation::validate_range(samples_per_pixel, 1, 16, "SamplesPerPixel")?;
        let samples_per_pixel = samples_per_pixel as u16;

        let bits_per_sample = read_uniform_bits(tiff_reader, source, ifd)?;

        if ifd.has_tag(tags::SAMPLE_FORMAT) {
            let formats = tiff_reader.read_tag_values(source, ifd, tags::SAMPLE_FORMAT)?;
            if let Some(&format) = formats.iter().find(|&&f| f != sample_format::UNSIGNED as u64) {
                return Err(TiffError::UnsupportedLayout(format!("SampleFormat {}", format)));
            }
        }

        if samples_per_pixel > 1 && ifd.get_planar_configuration() != planar_config::CHUNKY as u64 {
            return Err(TiffError::UnsupportedLayout("separate sample planes".to_string()));
        }

        let color = read_color_model(tiff_reader, source, ifd, bits_per_sample)?;
        if samples_per_pixel < color.color_samples() {
            return Err(TiffError::UnsupportedLayout(format!(
                "{} samples per pixel for {:?}", samples_per_pixel, color
            )));
        }

        let alpha = read_alpha(tiff_reader, source, ifd, &color, samples_per_pixel)?;

        let predictor_code = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE as u64) as u16;
        match predictor_code {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if bits_per_sample == 8 || bits_per_sample == 16 => {}
            _ => return Err(TiffError::UnsupportedLayout(format!(
                "Predictor {} with {} bits per sample", predictor_code, bits_per_sample
            ))),
        }

        let reverse_bits = ifd.get_tag_value(tags::FILL_ORDER) == Some(2);
        let grid = read_chunk_grid(tiff_reader, source, ifd, width, height)?;

        let layout = PageLayout {
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            color,
            alpha,
            compression: ifd.get_compression(),
            predictor: predictor_code,
            reverse_bits,
            byte_order,
            grid,
        };

        debug!("Page #{} layout: {}x{}, {} x {} bits, {} {}x{} chunks",
               ifd.number, layout.width, layout.height, layout.samples_per_pixel,
               layout.bits_per_sample, if layout.grid.tiled { "tiled" } else { "stripped" },
               layout.grid.chunk_width, layout.grid.chunk_height);

        Ok(layout)
    }

    /// Bytes in one row of a chunk, rows being padded to whole bytes
    pub fn chunk_row_bytes(&self) -> usize {
        let bits = self.grid.chunk_width as u64
            * self.samples_per_pixel as u64
            * self.bits_per_sample as u64;
        bits.div_ceil(8) as usize
    }

    /// Decompressed size of one full chunk, `None` if it does not fit in a `u64`
    pub fn chunk_bytes(&self) -> Option<u64> {
        let bits = (self.grid.chunk_width as u64)
            .checked_mul(self.samples_per_pixel as u64)?
            .checked_mul(self.bits_per_sample as u64)?;
        bits.div_ceil(8).checked_mul(self.grid.chunk_height as u64)
    }
}

fn read_uniform_bits(tiff_reader: &TiffReader, source: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<u16> {
    let bits = if ifd.has_tag(tags::BITS_PER_SAMPLE) {
        tiff_reader.read_tag_values(source, ifd, tags::BITS_PER_SAMPLE)?
    } else {
        vec![1]
    };

    let first = *bits.first().ok_or(TiffError::TagNotFound(tags::BITS_PER_SAMPLE))?;
    if bits.iter().any(|&b| b != first) {
        return Err(TiffError::UnsupportedLayout(format!("mixed BitsPerSample {:?}", bits)));
    }
    match first {
        1 | 2 | 4 | 8 | 16 => Ok(first as u16),
        _ => Err(TiffError::UnsupportedLayout(format!("{} bits per sample", first))),
    }
}

fn read_color_model(
    tiff_reader: &TiffReader,
    source: &mut dyn SeekableReader,
    ifd: &IFD,
    bits_per_sample: u16,
) -> TiffResult<ColorModel> {
    let code = ifd.get_photometric();
    match u16::try_from(code) {
        Ok(photometric::WHITE_IS_ZERO) => Ok(ColorModel::Gray { inverted: true }),
        Ok(photometric::BLACK_IS_ZERO) => Ok(ColorModel::Gray { inverted: false }),
        Ok(photometric::RGB) if bits_per_sample >= 8 => Ok(ColorModel::Rgb),
        Ok(photometric::PALETTE) if bits_per_sample <= 8 => {
            let raw = tiff_reader.read_tag_values(source, ifd, tags::COLOR_MAP)?;
            let entries = 1usize << bits_per_sample;
            if raw.len() < entries * 3 {
                return Err(TiffError::CorruptData(format!(
                    "ColorMap has {} values, expected {}", raw.len(), entries * 3
                )));
            }
            let colormap = (0..entries)
                .map(|i| {
                    [
                        (raw[i] >> 8) as u8,
                        (raw[entries + i] >> 8) as u8,
                        (raw[2 * entries + i] >> 8) as u8,
                    ]
                })
                .collect();
            Ok(ColorModel::Palette { colormap })
        }
        Ok(photometric::RGB) | Ok(photometric::PALETTE) => Err(TiffError::UnsupportedLayout(format!(
            "photometric {} with {} bits per sample", code, bits_per_sample
        ))),
        _ => Err(TiffError::UnsupportedPhotometric(code)),
    }
}

fn read_alpha(
    tiff_reader: &TiffReader,
    source: &mut dyn SeekableReader,
    ifd: &IFD,
    color: &ColorModel,
    samples_per_pixel: u16,
) -> TiffResult<Option<(u16, AlphaMode)>> {
    let color_samples = color.color_samples();
    if samples_per_pixel <= color_samples || !ifd.has_tag(tags::EXTRA_SAMPLES) {
        return Ok(None);
    }

    let extras = tiff_reader.read_tag_values(source, ifd, tags::EXTRA_SAMPLES)?;
    let mode = match extras.first().map(|&v| v as u16) {
        Some(extra_samples::ASSOCIATED_ALPHA) => Some(AlphaMode::Associated),
        Some(extra_samples::UNASSOCIATED_ALPHA) => Some(AlphaMode::Unassociated),
        _ => None,
    };

    Ok(mode.map(|mode| (color_samples, mode)))
}

fn read_chunk_grid(
    tiff_reader: &TiffReader,
    source: &mut dyn SeekableReader,
    ifd: &IFD,
    width: u32,
    height: u32,
) -> TiffResult<ChunkGrid> {
    let grid = if ifd.is_tiled() {
        let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0);
        let tile_height = ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0);
        validation::validate_range(tile_width, 1, u32::MAX as u64, "TileWidth")?;
        validation::validate_range(tile_height, 1, u32::MAX as u64, "TileLength")?;
        let (tile_width, tile_height) = (tile_width as u32, tile_height as u32);

        ChunkGrid {
            chunk_width: tile_width,
            chunk_height: tile_height,
            chunks_across: width.div_ceil(tile_width),
            chunks_down: height.div_ceil(tile_height),
            offsets: tiff_reader.read_tag_values(source, ifd, tags::TILE_OFFSETS)?,
            byte_counts: tiff_reader.read_tag_values(source, ifd, tags::TILE_BYTE_COUNTS)?,
            tiled: true,
        }
    } else {
        // A missing or oversized RowsPerStrip means one strip for the whole page
        let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
            .unwrap_or(height as u64)
            .clamp(1, height as u64) as u32;

        ChunkGrid {
            chunk_width: width,
            chunk_height: rows_per_strip,
            chunks_across: 1,
            chunks_down: height.div_ceil(rows_per_strip),
            offsets: tiff_reader.read_tag_values(source, ifd, tags::STRIP_OFFSETS)?,
            byte_counts: tiff_reader.read_tag_values(source, ifd, tags::STRIP_BYTE_COUNTS)?,
            tiled: false,
        }
    };

    let expected = grid.chunks_across as usize * grid.chunks_down as usize;
    if grid.offsets.len() < expected || grid.byte_counts.len() < expected {
        return Err(TiffError::CorruptData(format!(
            "{} offsets and {} byte counts for {} chunks",
            grid.offsets.len(), grid.byte_counts.len(), expected
        )));
    }

    Ok(grid)
}
