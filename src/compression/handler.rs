//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for decoding one compressed strip or tile
pub trait CompressionHandler: Send + Sync {
    /// Decompress the data
    ///
    /// `expected_len` is the size the decompressed block should have
    /// according to the directory. Handlers never produce much more than
    /// that; the caller checks the result against it.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;
}
