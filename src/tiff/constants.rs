//! TIFF format constants
//!
//! Only the values the reader and the region decoder act on are named here.

/// Header layout
pub mod header {
    pub const TIFF_VERSION: u16 = 42;
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// "II"
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];
    /// "MM"
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// Offset width a BigTIFF header must declare
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;

    /// First byte after a classic header
    pub const MIN_IFD_OFFSET: u64 = 8;
}

/// Directory entry field types, needed to size and skip every entry
pub mod field_types {
    // 1 byte
    pub const BYTE: u16 = 1;
    pub const ASCII: u16 = 2;
    pub const SBYTE: u16 = 6;
    pub const UNDEFINED: u16 = 7;
    // 2 bytes
    pub const SHORT: u16 = 3;
    pub const SSHORT: u16 = 8;
    // 4 bytes
    pub const LONG: u16 = 4;
    pub const SLONG: u16 = 9;
    pub const FLOAT: u16 = 11;
    pub const IFD: u16 = 13;
    // 8 bytes
    pub const RATIONAL: u16 = 5;
    pub const SRATIONAL: u16 = 10;
    pub const DOUBLE: u16 = 12;
    pub const LONG8: u16 = 16;
    pub const SLONG8: u16 = 17;
    pub const IFD8: u16 = 18;
}

/// Tags read while locating and decoding page data
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const FILL_ORDER: u16 = 266;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    /// Shown by the info listing
    pub const PAGE_NAME: u16 = 285;
    pub const PREDICTOR: u16 = 317;
    pub const COLOR_MAP: u16 = 320;
    pub const TILE_WIDTH: u16 = 322;
    pub const TILE_LENGTH: u16 = 323;
    pub const TILE_OFFSETS: u16 = 324;
    pub const TILE_BYTE_COUNTS: u16 = 325;
    pub const EXTRA_SAMPLES: u16 = 338;
    pub const SAMPLE_FORMAT: u16 = 339;
}

/// Compression schemes with a decompressor
pub mod compression {
    pub const NONE: u16 = 1;
    pub const LZW: u16 = 5;
    /// Adobe Deflate
    pub const DEFLATE: u16 = 8;
    pub const ZSTD: u16 = 14;
    pub const PACKBITS: u16 = 32773;
    /// Deflate as written before code 8 was assigned
    pub const DEFLATE_LEGACY: u16 = 32946;
}

/// Photometric interpretations the pixel converter understands
pub mod photometric {
    pub const WHITE_IS_ZERO: u16 = 0;
    pub const BLACK_IS_ZERO: u16 = 1;
    pub const RGB: u16 = 2;
    pub const PALETTE: u16 = 3;
}

pub mod planar_config {
    /// Samples of a pixel stored together
    pub const CHUNKY: u16 = 1;
}

pub mod sample_format {
    pub const UNSIGNED: u16 = 1;
}

pub mod predictor {
    pub const NONE: u16 = 1;
    pub const HORIZONTAL_DIFFERENCING: u16 = 2;
}

/// ExtraSamples values that mark an alpha channel
pub mod extra_samples {
    pub const ASSOCIATED_ALPHA: u16 = 1;
    pub const UNASSOCIATED_ALPHA: u16 = 2;
}
