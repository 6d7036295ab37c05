//! TIFF file format parsing module
//!
//! Reads the header and page directories of TIFF and BigTIFF files.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod constants;
pub(crate) mod validation;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::{TiffReader, TiffReaderBuilder};
pub use types::TiffDocument;
