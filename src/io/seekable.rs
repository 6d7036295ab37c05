//! Seekable reader trait
//!
//! Opened resources are handed around as `Box<dyn SeekableReader>` so the
//! decoder never needs to know whether it reads a file, a buffer or
//! something a resolver wrapped.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
