//! Custom error types for TIFF processing

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported photometric interpretation
    UnsupportedPhotometric(u64),
    /// Sample layout the decoder cannot convert to RGBA
    UnsupportedLayout(String),
    /// Image dimensions not found
    MissingDimensions,
    /// Requested page does not exist in the document
    PageNotFound { page: usize, page_count: usize },
    /// Requested region has no pixels inside the page
    EmptyRegion(String),
    /// Decompressed data is not what the directory describes
    CorruptData(String),
    /// Generic error with message
    GenericError(String),
}

impl TiffError {
    /// Whether the error describes a request the decoder cannot satisfy for
    /// this file, as opposed to a failure while reading it.
    ///
    /// Undecodable requests make the decoder answer "no image" instead of
    /// raising an error.
    pub fn is_undecodable(&self) -> bool {
        matches!(
            self,
            TiffError::UnsupportedCompression(_)
                | TiffError::UnsupportedPhotometric(_)
                | TiffError::UnsupportedLayout(_)
                | TiffError::MissingDimensions
                | TiffError::TagNotFound(_)
                | TiffError::PageNotFound { .. }
                | TiffError::EmptyRegion(_)
        )
    }
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::UnsupportedPhotometric(p) => write!(f, "Unsupported photometric interpretation: {}", p),
            TiffError::UnsupportedLayout(msg) => write!(f, "Unsupported sample layout: {}", msg),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::PageNotFound { page, page_count } => {
                write!(f, "Page {} not found (document has {} pages)", page, page_count)
            }
            TiffError::EmptyRegion(msg) => write!(f, "Empty region: {}", msg),
            TiffError::CorruptData(msg) => write!(f, "Corrupt image data: {}", msg),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
