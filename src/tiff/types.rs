//! Core TIFF data structures

use crate::io::byte_order::ByteOrder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use std::fmt;

/// A parsed TIFF file: its header facts and the chain of page directories
#[derive(Debug)]
pub struct TiffDocument {
    /// Image File Directories in chain order; entry `n` is page `n`
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
    /// Byte order declared in the header
    pub byte_order: ByteOrder,
}

impl TiffDocument {
    /// Creates a new document with no pages
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TiffDocument {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.ifds.len()
    }

    /// Looks up a page by zero-based index
    pub fn page(&self, index: usize) -> TiffResult<&IFD> {
        self.ifds.get(index).ok_or(TiffError::PageNotFound {
            page: index,
            page_count: self.ifds.len(),
        })
    }
}

impl fmt::Display for TiffDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Pages: {}", self.ifds.len())
    }
}
