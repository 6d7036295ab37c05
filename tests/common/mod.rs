//! Synthetic TIFF files for integration tests

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SHORT: u16 = 3;
pub const LONG: u16 = 4;
pub const LONG8: u16 = 16;
pub const ASCII: u16 = 2;

/// Compression applied to every chunk of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    None,
    Deflate,
    Zstd,
    Lzw,
}

impl Codec {
    fn code(self) -> u64 {
        match self {
            Codec::None => 1,
            Codec::Lzw => 5,
            Codec::Deflate => 8,
            Codec::Zstd => 14,
        }
    }

    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Codec::None => data.to_vec(),
            Codec::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            Codec::Zstd => zstd::encode_all(data, 3).unwrap(),
            Codec::Lzw => weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
                .encode(data)
                .unwrap(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Chunking {
    Strips { rows: u32 },
    Tiles { width: u32, height: u32 },
    /// One chunk holding the page data, declared as a tile of this size
    DeclaredTile { width: u32, height: u32 },
}

/// One page: its pixel data (packed rows) and how to store it
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub width: u32,
    pub height: u32,
    samples: u16,
    bits: u16,
    photometric: u16,
    data: Vec<u8>,
    chunking: Chunking,
    codec: Codec,
    predictor: bool,
    compression_override: Option<u64>,
    extra: Vec<(u16, u16, Vec<u64>)>,
}

impl PageSpec {
    pub fn new(width: u32, height: u32, samples: u16, bits: u16, photometric: u16, data: Vec<u8>) -> Self {
        let row_bytes = (width as usize * samples as usize * bits as usize).div_ceil(8);
        assert_eq!(data.len(), row_bytes * height as usize, "pixel data does not match page size");
        PageSpec {
            width,
            height,
            samples,
            bits,
            photometric,
            data,
            chunking: Chunking::Strips { rows: height },
            codec: Codec::None,
            predictor: false,
            compression_override: None,
            extra: Vec::new(),
        }
    }

    /// RGBA page with unassociated alpha
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        PageSpec::new(width, height, 4, 8, 2, pixels).tag(338, SHORT, &[2])
    }

    pub fn rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        PageSpec::new(width, height, 3, 8, 2, pixels)
    }

    pub fn gray8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        PageSpec::new(width, height, 1, 8, 1, pixels)
    }

    /// Palette page; `colormap` holds 16-bit red, then green, then blue values
    pub fn palette(width: u32, height: u32, bits: u16, indices: Vec<u8>, colormap: &[u64]) -> Self {
        PageSpec::new(width, height, 1, bits, 3, indices).tag(320, SHORT, colormap)
    }

    pub fn strips(mut self, rows: u32) -> Self {
        self.chunking = Chunking::Strips { rows };
        self
    }

    pub fn tiles(mut self, width: u32, height: u32) -> Self {
        self.chunking = Chunking::Tiles { width, height };
        self
    }

    /// Stores the page in a single chunk but declares it a `width` x `height` tile
    pub fn declared_tile(mut self, width: u32, height: u32) -> Self {
        self.chunking = Chunking::DeclaredTile { width, height };
        self
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Stores 8-bit samples with horizontal differencing
    pub fn predictor(mut self) -> Self {
        self.predictor = true;
        self
    }

    /// Writes this compression code instead of the codec's
    pub fn compression_code(mut self, code: u64) -> Self {
        self.compression_override = Some(code);
        self
    }

    pub fn tag(mut self, tag: u16, field_type: u16, values: &[u64]) -> Self {
        self.extra.push((tag, field_type, values.to_vec()));
        self
    }

    pub fn page_name(self, name: &str) -> Self {
        let mut values: Vec<u64> = name.bytes().map(u64::from).collect();
        values.push(0);
        self.tag(285, ASCII, &values)
    }

    fn bytes_per_pixel(&self) -> usize {
        self.samples as usize * self.bits as usize / 8
    }

    fn difference(&self, rows: &mut [u8], row_bytes: usize) {
        let stride = self.samples as usize;
        for row in rows.chunks_mut(row_bytes) {
            for i in (stride..row.len()).rev() {
                row[i] = row[i].wrapping_sub(row[i - stride]);
            }
        }
    }

    /// Uncompressed chunks in row-major order
    fn raw_chunks(&self) -> Vec<Vec<u8>> {
        let row_bytes = (self.width as usize * self.samples as usize * self.bits as usize).div_ceil(8);
        match self.chunking {
            Chunking::Strips { rows } => self.data
                .chunks(row_bytes * rows as usize)
                .map(|chunk| chunk.to_vec())
                .collect(),
            Chunking::Tiles { width, height } => {
                let bpp = self.bytes_per_pixel();
                let tile_row_bytes = width as usize * bpp;
                let mut tiles = Vec::new();
                for ty in 0..self.height.div_ceil(height) {
                    for tx in 0..self.width.div_ceil(width) {
                        let mut tile = vec![0u8; tile_row_bytes * height as usize];
                        for row in 0..height {
                            let y = ty * height + row;
                            if y >= self.height {
                                break;
                            }
                            let x0 = tx * width;
                            let columns = width.min(self.width - x0) as usize;
                            let from = y as usize * row_bytes + x0 as usize * bpp;
                            let to = row as usize * tile_row_bytes;
                            tile[to..to + columns * bpp].copy_from_slice(&self.data[from..from + columns * bpp]);
                        }
                        tiles.push(tile);
                    }
                }
                tiles
            }
            Chunking::DeclaredTile { .. } => vec![self.data.clone()],
        }
    }

    fn chunks(&self) -> Vec<Vec<u8>> {
        let chunk_row_bytes = match self.chunking {
            Chunking::Strips { .. } | Chunking::DeclaredTile { .. } => (self.width as usize * self.samples as usize * self.bits as usize).div_ceil(8),
            Chunking::Tiles { width, .. } => width as usize * self.bytes_per_pixel(),
        };
        self.raw_chunks()
            .into_iter()
            .map(|mut chunk| {
                if self.predictor {
                    self.difference(&mut chunk, chunk_row_bytes);
                }
                self.codec.compress(&chunk)
            })
            .collect()
    }

    fn entries(&self, offsets: Vec<u64>, counts: Vec<u64>, big_tiff: bool) -> Vec<(u16, u16, Vec<u64>)> {
        let pointer_type = if big_tiff { LONG8 } else { LONG };
        let mut entries = vec![
            (256, LONG, vec![self.width as u64]),
            (257, LONG, vec![self.height as u64]),
            (258, SHORT, vec![self.bits as u64; self.samples as usize]),
            (259, SHORT, vec![self.compression_override.unwrap_or(self.codec.code())]),
            (262, SHORT, vec![self.photometric as u64]),
            (277, SHORT, vec![self.samples as u64]),
        ];
        match self.chunking {
            Chunking::Strips { rows } => {
                entries.push((273, pointer_type, offsets));
                entries.push((278, LONG, vec![rows as u64]));
                entries.push((279, pointer_type, counts));
            }
            Chunking::Tiles { width, height } | Chunking::DeclaredTile { width, height } => {
                entries.push((322, LONG, vec![width as u64]));
                entries.push((323, LONG, vec![height as u64]));
                entries.push((324, pointer_type, offsets));
                entries.push((325, pointer_type, counts));
            }
        }
        if self.predictor {
            entries.push((317, SHORT, vec![2]));
        }
        entries.extend(self.extra.iter().cloned());
        entries.sort_by_key(|e| e.0);
        entries
    }
}

/// Writes classic or BigTIFF files in either byte order
pub struct TiffWriter {
    pub big_endian: bool,
    pub big_tiff: bool,
}

impl TiffWriter {
    pub fn classic() -> Self {
        TiffWriter { big_endian: false, big_tiff: false }
    }

    pub fn new(big_endian: bool, big_tiff: bool) -> Self {
        TiffWriter { big_endian, big_tiff }
    }

    fn offset_size(&self) -> usize {
        if self.big_tiff { 8 } else { 4 }
    }

    fn put(&self, out: &mut Vec<u8>, size: usize, value: u64) {
        match (size, self.big_endian) {
            (1, _) => out.push(value as u8),
            (2, true) => out.write_u16::<BigEndian>(value as u16).unwrap(),
            (2, false) => out.write_u16::<LittleEndian>(value as u16).unwrap(),
            (4, true) => out.write_u32::<BigEndian>(value as u32).unwrap(),
            (4, false) => out.write_u32::<LittleEndian>(value as u32).unwrap(),
            (_, true) => out.write_u64::<BigEndian>(value).unwrap(),
            (_, false) => out.write_u64::<LittleEndian>(value).unwrap(),
        }
    }

    fn patch(&self, out: &mut [u8], at: usize, value: u64) {
        match (self.big_tiff, self.big_endian) {
            (true, true) => BigEndian::write_u64(&mut out[at..at + 8], value),
            (true, false) => LittleEndian::write_u64(&mut out[at..at + 8], value),
            (false, true) => BigEndian::write_u32(&mut out[at..at + 4], value as u32),
            (false, false) => LittleEndian::write_u32(&mut out[at..at + 4], value as u32),
        }
    }

    fn align(out: &mut Vec<u8>) {
        if out.len() % 2 == 1 {
            out.push(0);
        }
    }

    pub fn write(&self, pages: &[PageSpec]) -> Vec<u8> {
        let offset_size = self.offset_size();
        let mut out = Vec::new();
        out.extend_from_slice(if self.big_endian { b"MM" } else { b"II" });
        if self.big_tiff {
            self.put(&mut out, 2, 43);
            self.put(&mut out, 2, 8);
            self.put(&mut out, 2, 0);
        } else {
            self.put(&mut out, 2, 42);
        }
        let mut pointer_at = out.len();
        self.put(&mut out, offset_size, 0);

        for page in pages {
            let mut offsets = Vec::new();
            let mut counts = Vec::new();
            for chunk in page.chunks() {
                Self::align(&mut out);
                offsets.push(out.len() as u64);
                counts.push(chunk.len() as u64);
                out.extend_from_slice(&chunk);
            }

            let entries = page.entries(offsets, counts, self.big_tiff);
            let mut fields = Vec::new();
            for (_, field_type, values) in &entries {
                let size = match *field_type {
                    SHORT => 2,
                    LONG => 4,
                    LONG8 => 8,
                    _ => 1,
                };
                let mut bytes = Vec::new();
                for &value in values {
                    self.put(&mut bytes, size, value);
                }
                if bytes.len() <= offset_size {
                    bytes.resize(offset_size, 0);
                    fields.push(bytes);
                } else {
                    Self::align(&mut out);
                    let at = out.len() as u64;
                    out.extend_from_slice(&bytes);
                    let mut field = Vec::new();
                    self.put(&mut field, offset_size, at);
                    fields.push(field);
                }
            }

            Self::align(&mut out);
            let ifd_offset = out.len() as u64;
            self.patch(&mut out, pointer_at, ifd_offset);

            self.put(&mut out, if self.big_tiff { 8 } else { 2 }, entries.len() as u64);
            for ((tag, field_type, values), field) in entries.iter().zip(&fields) {
                self.put(&mut out, 2, *tag as u64);
                self.put(&mut out, 2, *field_type as u64);
                self.put(&mut out, offset_size, values.len() as u64);
                out.extend_from_slice(field);
            }
            pointer_at = out.len();
            self.put(&mut out, offset_size, 0);
        }

        out
    }
}

/// Test pattern pixel of page `page` at (x, y)
pub fn pattern_pixel(x: u32, y: u32, page: u32) -> [u8; 4] {
    [(x * 3) as u8, (y * 5) as u8, (page * 40 + x + y) as u8, (200 + page) as u8]
}

/// RGBA pixels of the test pattern
pub fn pattern_rgba(width: u32, height: u32, page: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&pattern_pixel(x, y, page));
        }
    }
    pixels
}

/// Pattern page `page` of the given size, stored in strips of 3 rows
pub fn pattern_page(width: u32, height: u32, page: u32) -> PageSpec {
    PageSpec::rgba8(width, height, pattern_rgba(width, height, page)).strips(3)
}

/// Expected output for a region already inside the page
pub fn expected_region(left: u32, top: u32, width: u32, height: u32, sample_size: u32, page: u32) -> Vec<u8> {
    let mut pixels = Vec::new();
    for y in (top..top + height).step_by(sample_size as usize) {
        for x in (left..left + width).step_by(sample_size as usize) {
            pixels.extend_from_slice(&pattern_pixel(x, y, page));
        }
    }
    pixels
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Three pattern pages of 40x30, 20x15 and 10x8 pixels
pub fn three_page_file(dir: &Path) -> PathBuf {
    let pages = [pattern_page(40, 30, 0), pattern_page(20, 15, 1), pattern_page(10, 8, 2)];
    write_file(dir, "three-pages.tif", &TiffWriter::classic().write(&pages))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
