//! Byte order handling for TIFF files
//!
//! A TIFF file declares its endianness in the first two bytes. Everything
//! after that, header fields, IFD entries and 16-bit samples, is read
//! through a `ByteOrderHandler` chosen from that marker.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;
use std::marker::PhantomData;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the two marker bytes at the start of the file
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker)?;
        match marker {
            header::LITTLE_ENDIAN_MARKER => Ok(ByteOrder::LittleEndian),
            header::BIG_ENDIAN_MARKER => Ok(ByteOrder::BigEndian),
            _ => Err(TiffError::InvalidByteOrder(u16::from_le_bytes(marker))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler::default()),
            ByteOrder::BigEndian => Box::new(BigEndianHandler::default()),
        }
    }

    /// Interprets two bytes of sample data in this byte order
    pub fn u16_from_bytes(&self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    /// Writes a 16-bit sample back in this byte order
    pub fn u16_to_bytes(&self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Which byte order this handler decodes
    fn byte_order(&self) -> ByteOrder;

    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;
}

/// Handler generic over the `byteorder` endianness marker types
pub struct EndianHandler<E> {
    order: ByteOrder,
    _endian: PhantomData<E>,
}

/// Little-endian byte order handler
pub type LittleEndianHandler = EndianHandler<LittleEndian>;

/// Big-endian byte order handler
pub type BigEndianHandler = EndianHandler<BigEndian>;

impl Default for EndianHandler<LittleEndian> {
    fn default() -> Self {
        EndianHandler { order: ByteOrder::LittleEndian, _endian: PhantomData }
    }
}

impl Default for EndianHandler<BigEndian> {
    fn default() -> Self {
        EndianHandler { order: ByteOrder::BigEndian, _endian: PhantomData }
    }
}

impl<E> ByteOrderHandler for EndianHandler<E>
where
    E: byteorder::ByteOrder + Send + Sync,
{
    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<E>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<E>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<E>()
    }
}
