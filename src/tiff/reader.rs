//! TIFF file reader implementation
//!
//! Parses the header and walks the IFD chain of classic TIFF and BigTIFF
//! files, using the byte order strategy selected by the header.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::io::{Cursor, SeekFrom};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TiffDocument;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::ifd_utils;
use crate::utils::string_utils;
use crate::utils::tag_utils;

/// Default bound on the number of directories followed in one chain
pub const DEFAULT_MAX_PAGES: usize = 1024;

/// Builder for TiffReader
pub struct TiffReaderBuilder {
    max_pages: usize,
}

impl TiffReaderBuilder {
    /// Create a new TiffReaderBuilder
    pub fn new() -> Self {
        TiffReaderBuilder { max_pages: DEFAULT_MAX_PAGES }
    }

    /// Limit how many directories are read from the chain
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Build the TiffReader
    pub fn build(self) -> TiffReader {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
            max_pages: self.max_pages,
        }
    }
}

impl Default for TiffReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader for TIFF and BigTIFF files
///
/// A reader is cheap to create and holds the byte order of the last file it
/// read, so tag arrays of that file can be fetched afterwards. Use one
/// reader per open file.
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
    /// Maximum number of directories to follow
    max_pages: usize,
}

impl TiffReader {
    /// Creates a new TIFF reader with default limits
    pub fn new() -> Self {
        TiffReaderBuilder::new().build()
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads the header and every page directory from the given reader
    ///
    /// # Arguments
    /// * `reader` - Any struct implementing the SeekableReader trait
    ///
    /// # Returns
    /// The parsed document; pages are the IFDs in chain order
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TiffDocument> {
        reader.seek(SeekFrom::Start(0))?;

        let handler = format_utils::detect_byte_order(reader)?;
        let byte_order = handler.byte_order();
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;
        self.is_big_tiff = is_big_tiff;
        self.byte_order_handler = Some(handler);

        let handler = self.handler()?;
        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, handler)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut document = TiffDocument::new(is_big_tiff, byte_order);
        document.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if document.ifds.is_empty() {
            return Err(TiffError::InvalidHeader);
        }

        info!("Read {} page(s) from {} file",
              document.ifds.len(), if is_big_tiff { "BigTIFF" } else { "TIFF" });
        Ok(document)
    }

    /// Reads the chain of IFDs starting from the given offset
    ///
    /// The chain stops at a zero offset, at the page limit, at an offset
    /// outside the file, or when an offset repeats. A broken directory after
    /// the first one ends the chain without failing the whole file.
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 {
            if ifds.len() >= self.max_pages {
                warn!("Page limit {} reached, ignoring remaining directories", self.max_pages);
                break;
            }
            if !visited.insert(ifd_offset) {
                warn!("IFD offset {} already visited, stopping chain", ifd_offset);
                break;
            }
            if validation::validate_ifd_offset(ifd_offset, file_size).is_err() {
                warn!("IFD offset {} outside file of {} bytes, stopping chain", ifd_offset, file_size);
                break;
            }

            match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok((ifd, next_offset)) => {
                    debug!("IFD #{} has {} entries, next at {}", ifd.number, ifd.entry_count(), next_offset);
                    ifds.push(ifd);
                    ifd_offset = next_offset;
                }
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            }
        }

        Ok(ifds)
    }

    /// Reads one IFD and the offset of the next one
    ///
    /// # Arguments
    /// * `reader` - The seekable reader to use
    /// * `offset` - Offset in the file where the IFD starts
    /// * `number` - The index of this IFD in the chain
    pub fn read_ifd(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        number: usize,
    ) -> TiffResult<(IFD, u64)> {
        reader.seek(SeekFrom::Start(offset))?;
        let handler = self.handler()?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        validation::validate_entry_count(entry_count, self.is_big_tiff)?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader, handler)?;
            ifd.add_entry(entry);
        }

        let next_offset = ifd_utils::read_ifd_offset(reader, self.is_big_tiff, handler)?;
        Ok((ifd, next_offset))
    }

    /// Reads a single IFD entry, decoding its values when they fit inline
    fn read_ifd_entry(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
    ) -> TiffResult<IFDEntry> {
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut raw = vec![0u8; if self.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(&mut raw)?;

        if tag_utils::is_value_inline(field_type, count, self.is_big_tiff) {
            let mut values = Vec::with_capacity(count as usize);
            let mut inline_reader = Cursor::new(raw.as_slice());
            // Unknown field types cannot be decoded; keep the entry without values
            match tag_utils::read_tag_value_array(&mut inline_reader, field_type, count, handler, &mut values) {
                Ok(()) => Ok(IFDEntry::with_inline_values(tag, field_type, values)),
                Err(TiffError::UnsupportedFieldType(_)) => Ok(IFDEntry::new(tag, field_type, count, 0)),
                Err(e) => Err(e),
            }
        } else {
            let mut offset_reader = Cursor::new(raw.as_slice());
            let value_offset = ifd_utils::read_ifd_offset(&mut offset_reader, self.is_big_tiff, handler)?;
            Ok(IFDEntry::new(tag, field_type, count, value_offset))
        }
    }

    /// Reads all values of a tag as u64
    ///
    /// # Arguments
    /// * `reader` - The reader of the file the IFD came from
    /// * `ifd` - The IFD containing the tag
    /// * `tag` - The tag number to read
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        if let Some(values) = &entry.inline_values {
            return Ok(values.clone());
        }

        let file_size = validation::get_file_size(reader)?;
        validation::validate_value_extent(entry, file_size)?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut values = Vec::with_capacity(entry.count as usize);
        tag_utils::read_tag_value_array(reader, entry.field_type, entry.count, self.handler()?, &mut values)?;

        Ok(values)
    }

    /// Reads an ASCII tag such as PageName, without trailing nulls
    pub fn read_ascii_tag(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let mut bytes: Vec<u8> = self.read_tag_values(reader, ifd, tag)?
            .into_iter()
            .map(|value| value as u8)
            .collect();
        string_utils::trim_trailing_nulls(&mut bytes);

        String::from_utf8(bytes)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string: {}", e)))
    }

    /// Returns whether the last file read is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Byte order of the last file read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|handler| handler.byte_order())
    }
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}
